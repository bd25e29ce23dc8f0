//! Error types for the watermark compositor.
//!
//! Uses thiserror for structured errors. Every check the validator performs
//! maps to exactly one [`ValidationError`] variant, and the `Display` text of
//! each variant is the message shown to the user.

use crate::core::types::RasterRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type.
///
/// Wraps validation failures together with the I/O and codec errors raised
/// by the loader and writer.
#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// User input that a numeric or compound check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// Blend weight, 0-100
    Weight,
    /// Transparency color, three channels
    TransparencyColor,
    /// Single placement coordinates
    Position,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::Weight => write!(f, "transparency percentage"),
            InputField::TransparencyColor => write!(f, "transparency color input"),
            InputField::Position => write!(f, "position input"),
        }
    }
}

/// Which part of the color-depth rule a raster broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ColorDepthIssue {
    /// Not exactly three color components.
    ColorComponents { found: u8 },
    /// Neither 24 nor 32 bits per pixel.
    BitsPerPixel { found: u16 },
}

/// Failures detected before any compositing starts.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("The file {path} doesn't exist.")]
    FileNotFound { path: String },

    #[error("{}", color_depth_message(.role, .issue))]
    UnsupportedColorDepth {
        role: RasterRole,
        issue: ColorDepthIssue,
    },

    #[error("The watermark's dimensions are larger.")]
    DimensionTooLarge {
        image: (u32, u32),
        watermark: (u32, u32),
    },

    #[error("The image and watermark dimensions are different.")]
    DimensionMismatch {
        image: (u32, u32),
        watermark: (u32, u32),
    },

    #[error("{}", not_an_integer_message(.field))]
    NotAnInteger { field: InputField, input: String },

    #[error("{}", out_of_range_message(.field))]
    OutOfRange { field: InputField, value: i64 },

    #[error("The {field} is invalid.")]
    WrongArity {
        field: InputField,
        expected: usize,
        got: usize,
    },

    #[error("The position method input is invalid.")]
    InvalidPlacementMethod { input: String },

    #[error("The output file extension isn't \"jpg\" or \"png\".")]
    InvalidOutputExtension { filename: String },

    #[error("A transparency color can't be combined with the watermark's alpha channel.")]
    ConflictingTransparency,
}

fn color_depth_message(role: &RasterRole, issue: &ColorDepthIssue) -> String {
    match issue {
        ColorDepthIssue::ColorComponents { .. } => {
            format!("The number of {} color components isn't 3.", role)
        }
        ColorDepthIssue::BitsPerPixel { .. } => format!("The {} isn't 24 or 32-bit.", role),
    }
}

fn not_an_integer_message(field: &InputField) -> String {
    match field {
        InputField::Weight => format!("The {} isn't an integer number.", field),
        _ => format!("The {} is invalid.", field),
    }
}

// A bad color channel is reported like any other malformed color.
fn out_of_range_message(field: &InputField) -> String {
    match field {
        InputField::TransparencyColor => format!("The {} is invalid.", field),
        _ => format!("The {} is out of range.", field),
    }
}

/// Stable name for each taxonomy entry, independent of message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedColorDepth,
    DimensionTooLarge,
    DimensionMismatch,
    NotAnInteger,
    OutOfRange,
    WrongArity,
    InvalidPlacementMethod,
    InvalidOutputExtension,
    ConflictingTransparency,
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ValidationError {
    /// Taxonomy entry of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ValidationError::UnsupportedColorDepth { .. } => ErrorKind::UnsupportedColorDepth,
            ValidationError::DimensionTooLarge { .. } => ErrorKind::DimensionTooLarge,
            ValidationError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            ValidationError::NotAnInteger { .. } => ErrorKind::NotAnInteger,
            ValidationError::OutOfRange { .. } => ErrorKind::OutOfRange,
            ValidationError::WrongArity { .. } => ErrorKind::WrongArity,
            ValidationError::InvalidPlacementMethod { .. } => ErrorKind::InvalidPlacementMethod,
            ValidationError::InvalidOutputExtension { .. } => ErrorKind::InvalidOutputExtension,
            ValidationError::ConflictingTransparency => ErrorKind::ConflictingTransparency,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::FileNotFound { path } => {
                Some(format!("Check that the file '{}' exists", path))
            }
            ValidationError::UnsupportedColorDepth { .. } => {
                Some("Convert the file to 8-bit RGB or RGBA".to_string())
            }
            ValidationError::DimensionTooLarge { image, .. } => Some(format!(
                "Use a watermark no larger than {}x{}",
                image.0, image.1
            )),
            ValidationError::DimensionMismatch { image, .. } => Some(format!(
                "Resize the watermark to exactly {}x{}",
                image.0, image.1
            )),
            ValidationError::InvalidPlacementMethod { .. } => {
                Some("Answer 'single' or 'grid'".to_string())
            }
            ValidationError::InvalidOutputExtension { .. } => {
                Some("End the output filename with .jpg or .png".to_string())
            }
            _ => None,
        }
    }
}

impl WatermarkError {
    /// The validation failure behind this error, if that is what it is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            WatermarkError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for crate operations.
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
