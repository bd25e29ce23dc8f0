//! Core raster and color types shared by validation and compositing.
//!
//! A [`Raster`] is always held as RGBA8 internally so the compositor can read
//! any decoded layout uniformly, but it remembers the layout it was decoded
//! from. Color-depth validation works on that remembered layout, never on the
//! normalized buffer.

use image::buffer::ConvertBuffer;
use image::{ColorType, DynamicImage, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which of the two input images a value refers to.
///
/// Used to phrase messages so the user can tell which file failed a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterRole {
    /// The base image the watermark is applied to.
    Image,
    /// The watermark image.
    Watermark,
}

impl fmt::Display for RasterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterRole::Image => write!(f, "image"),
            RasterRole::Watermark => write!(f, "watermark"),
        }
    }
}

/// Opaque RGB color value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Decoded pixel layout of a raster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorLayout {
    /// Total number of channels, alpha included.
    pub channels: u8,
    /// Number of color channels (alpha excluded).
    pub color_components: u8,
    /// Bits used by one pixel across all channels.
    pub bits_per_pixel: u16,
    /// Whether the layout carries an alpha channel.
    pub has_alpha: bool,
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Layout the pixels were decoded with
    pub layout: ColorLayout,
}

/// Where a raster's pixels came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "ref_type", content = "value")]
pub enum RasterSource {
    /// Decoded from a file on disk
    FilePath(PathBuf),
    /// Built in memory (tests, compositor output)
    InMemory,
}

/// Encodings the writer can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

/// Decoded bitmap with read-only pixel access.
///
/// Cloning is cheap: pixel data sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Dimensions and decoded layout
    pub metadata: ImageMetadata,
    /// Origin of the pixel data
    pub source: RasterSource,
    pixels: Arc<RgbaImage>,
}

// ============================================================================
// Raster Implementation
// ============================================================================

impl Raster {
    /// Wrap a decoded image. The original color layout is recorded before
    /// the pixels are normalized to RGBA8.
    pub fn new(image: DynamicImage) -> Self {
        let layout = ColorLayout::from_color_type(image.color());
        let pixels = image.into_rgba8();

        Self {
            metadata: ImageMetadata {
                width: pixels.width(),
                height: pixels.height(),
                layout,
            },
            source: RasterSource::InMemory,
            pixels: Arc::new(pixels),
        }
    }

    /// Wrap an image that was decoded from `path`.
    pub fn from_file(image: DynamicImage, path: impl Into<PathBuf>) -> Self {
        Self {
            source: RasterSource::FilePath(path.into()),
            ..Self::new(image)
        }
    }

    /// Build an opaque 24-bit raster from an RGB buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self::new(DynamicImage::ImageRgb8(image))
    }

    /// Build a 32-bit raster with alpha from an RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::new(DynamicImage::ImageRgba8(image))
    }

    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.metadata.width, self.metadata.height)
    }

    /// Whether the decoded layout exposes an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.metadata.layout.has_alpha
    }

    /// Color of the pixel at (x, y).
    ///
    /// Panics if the coordinates are outside the raster, like
    /// [`image::ImageBuffer::get_pixel`].
    pub fn rgb(&self, x: u32, y: u32) -> Rgb<u8> {
        let p = self.pixels.get_pixel(x, y);
        Rgb([p[0], p[1], p[2]])
    }

    /// Alpha of the pixel at (x, y), or `None` when the raster has no alpha
    /// channel (fully opaque).
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        if self.has_alpha() {
            Some(self.pixels.get_pixel(x, y)[3])
        } else {
            None
        }
    }

    /// Normalized RGBA view of the pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy the color channels into a fresh opaque buffer.
    pub fn to_rgb8(&self) -> RgbImage {
        self.pixels.convert()
    }
}

// ============================================================================
// ColorLayout Implementation
// ============================================================================

impl ColorLayout {
    /// Describe the layout of an `image` crate color type.
    pub fn from_color_type(color: ColorType) -> Self {
        let channels = color.channel_count();
        let has_alpha = color.has_alpha();

        Self {
            channels,
            color_components: channels - u8::from(has_alpha),
            bits_per_pixel: color.bits_per_pixel(),
            has_alpha,
        }
    }
}

// ============================================================================
// OutputFormat Implementation
// ============================================================================

impl OutputFormat {
    /// Pick the output encoding from a file name. Only `jpg` and `png`
    /// extensions are accepted, in any letter case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|s| s.to_str())?;
        match ext.to_lowercase().as_str() {
            "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl Color {
    /// Create a color from RGB components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Create from image crate's Rgb type.
    pub fn from_rgb(rgb: Rgb<u8>) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Exact per-channel equality with a pixel.
    pub fn matches(&self, pixel: Rgb<u8>) -> bool {
        self.r == pixel[0] && self.g == pixel[1] && self.b == pixel[2]
    }

    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
