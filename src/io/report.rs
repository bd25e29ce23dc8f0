//! Image metadata report.

use crate::core::types::Raster;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// How an image uses its alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transparency {
    /// No alpha channel.
    Opaque,
    /// Alpha channel whose values are all 0 or 255.
    Bitmask,
    /// Alpha channel with intermediate values.
    Translucent,
}

impl Transparency {
    /// Classify a raster by its alpha values.
    pub fn of(raster: &Raster) -> Self {
        if !raster.has_alpha() {
            return Transparency::Opaque;
        }

        let partial = raster
            .pixels()
            .pixels()
            .any(|p| p[3] != 0 && p[3] != u8::MAX);
        if partial {
            Transparency::Translucent
        } else {
            Transparency::Bitmask
        }
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transparency::Opaque => write!(f, "OPAQUE"),
            Transparency::Bitmask => write!(f, "BITMASK"),
            Transparency::Translucent => write!(f, "TRANSLUCENT"),
        }
    }
}

/// Basic facts about a loaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub color_components: u8,
    pub bits_per_pixel: u16,
    pub transparency: Transparency,
}

impl ImageReport {
    pub fn from_raster(file: &Path, raster: &Raster) -> Self {
        let layout = raster.metadata.layout;
        Self {
            file: file.to_path_buf(),
            width: raster.width(),
            height: raster.height(),
            components: layout.channels,
            color_components: layout.color_components,
            bits_per_pixel: layout.bits_per_pixel,
            transparency: Transparency::of(raster),
        }
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image file: {}", self.file.display())?;
        writeln!(f, "Width: {}", self.width)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Number of components: {}", self.components)?;
        writeln!(f, "Number of color components: {}", self.color_components)?;
        writeln!(f, "Bits per pixel: {}", self.bits_per_pixel)?;
        write!(f, "Transparency: {}", self.transparency)
    }
}
