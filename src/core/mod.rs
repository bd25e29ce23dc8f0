//! Core types for the watermark compositor.
//!
//! This module contains the foundational types shared by every other module:
//! - Raster and color types
//! - Resolved blend configuration
//! - Error types
//! - Runtime settings

pub mod config;
pub mod error;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use config::{BlendConfig, BlendConfigBuilder, DimensionMode, Placement, Weight};
pub use error::{ErrorKind, ValidationError, WatermarkError, WatermarkResult};
pub use settings::Settings;
pub use types::{Color, ImageMetadata, OutputFormat, Raster, RasterRole};
