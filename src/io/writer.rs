//! Output writing.

use crate::core::error::WatermarkResult;
use crate::core::types::OutputFormat;
use crate::validation::rules::validate_output_path;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::RgbImage;
use log::info;
use std::path::Path;

/// Encode `image` to `path`, picking JPEG or PNG from the extension.
///
/// The image is encoded in memory first. The file is only created once the
/// extension is accepted and encoding has succeeded, so a failure leaves
/// nothing behind.
pub fn save_raster(
    image: &RgbImage,
    path: &Path,
    jpeg_quality: u8,
) -> WatermarkResult<OutputFormat> {
    let format = validate_output_path(path)?;

    let mut encoded = Vec::new();
    match format {
        OutputFormat::Jpeg => image.write_with_encoder(JpegEncoder::new_with_quality(
            &mut encoded,
            jpeg_quality,
        ))?,
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut encoded))?,
    }
    std::fs::write(path, &encoded)?;

    info!(
        "wrote {}x{} {} to {}",
        image.width(),
        image.height(),
        format.extension(),
        path.display()
    );
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use image::{ImageBuffer, Rgb};

    fn sample() -> RgbImage {
        ImageBuffer::from_fn(4, 3, |x, y| Rgb([x as u8 * 60, y as u8 * 80, 128]))
    }

    #[test]
    fn test_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        assert_eq!(save_raster(&sample(), &path, 90).unwrap(), OutputFormat::Png);
        let back = image::open(&path).unwrap().into_rgb8();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_jpeg_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        assert_eq!(save_raster(&sample(), &path, 75).unwrap(), OutputFormat::Jpeg);
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (4, 3));
    }

    #[test]
    fn test_bad_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");

        let err = save_raster(&sample(), &path, 90).unwrap_err();
        assert_eq!(
            err.as_validation().map(|e| e.kind()),
            Some(ErrorKind::InvalidOutputExtension)
        );
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.jpg");
        // Wider than the JPEG format allows.
        let wide = RgbImage::new(70_000, 1);

        let err = save_raster(&wide, &path, 90).unwrap_err();
        assert!(matches!(err, crate::core::error::WatermarkError::Image(_)));
        assert!(!path.exists());
    }
}
