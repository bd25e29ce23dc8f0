//! Raster loading.

use crate::core::error::WatermarkResult;
use crate::core::types::Raster;
use crate::validation::rules::validate_input_path;
use image::ImageReader;
use log::debug;
use std::path::Path;

/// Decode the image at `path`.
///
/// A missing file is reported as [`FileNotFound`] before any decoding is
/// attempted. The format is sniffed from the file contents, so a PNG saved
/// with a `.jpg` name still loads.
///
/// [`FileNotFound`]: crate::core::error::ValidationError::FileNotFound
pub fn load_raster(path: impl AsRef<Path>) -> WatermarkResult<Raster> {
    let path = path.as_ref();
    validate_input_path(path)?;

    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let raster = Raster::from_file(image, path);
    debug!(
        "loaded {} ({}x{}, {} bpp, alpha: {})",
        path.display(),
        raster.width(),
        raster.height(),
        raster.metadata.layout.bits_per_pixel,
        raster.has_alpha()
    );

    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ErrorKind, WatermarkError};
    use image::{ImageBuffer, Rgb, Rgba, RgbImage, RgbaImage};

    #[test]
    fn test_missing_file() {
        let err = load_raster("/no/such/dir/base.png").unwrap_err();
        assert_eq!(
            err.as_validation().map(|e| e.kind()),
            Some(ErrorKind::FileNotFound)
        );
        assert_eq!(err.to_string(), "The file /no/such/dir/base.png doesn't exist.");
    }

    #[test]
    fn test_loads_rgb_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.png");
        let img: RgbImage = ImageBuffer::from_pixel(3, 2, Rgb([9, 8, 7]));
        img.save(&path).unwrap();

        let raster = load_raster(&path).unwrap();
        assert_eq!(raster.dimensions(), (3, 2));
        assert!(!raster.has_alpha());
        assert_eq!(raster.metadata.layout.bits_per_pixel, 24);
        assert_eq!(raster.rgb(2, 1), Rgb([9, 8, 7]));
    }

    #[test]
    fn test_loads_rgba_png_with_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.png");
        let img: RgbaImage = ImageBuffer::from_pixel(1, 1, Rgba([1, 2, 3, 0]));
        img.save(&path).unwrap();

        let raster = load_raster(&path).unwrap();
        assert!(raster.has_alpha());
        assert_eq!(raster.alpha(0, 0), Some(0));
        assert_eq!(raster.metadata.layout.bits_per_pixel, 32);
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            load_raster(&path),
            Err(WatermarkError::Image(_))
        ));
    }
}
