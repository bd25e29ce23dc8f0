//! # Watermark - Weighted Image Compositing
//!
//! Blends a watermark image over a base image with a user-chosen weight,
//! either once at a chosen position or tiled across the whole image.
//!
//! ## Features
//!
//! - **Weighted blend**: every overlapped channel becomes
//!   `(w * watermark + (100 - w) * base) / 100`
//! - **Transparency**: skip watermark pixels by alpha or by an exact color key
//! - **Tiling**: repeat the watermark on a grid anchored at the origin
//! - **Validation**: every input is checked before anything is written
//! - **Parallel rows**: tile rows are blended on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use watermark::prelude::*;
//!
//! let base = load_raster("photo.png")?;
//! let mark = load_raster("logo.png")?;
//!
//! let config = BlendConfig::builder(Weight::new(40)?)
//!     .transparency_color(Some(Color::WHITE))
//!     .placement(Placement::Grid)
//!     .build()?;
//!
//! let job = PreparedJob::new(base, mark, config, "photo-marked.jpg")?;
//! job.run(&Compositor::new(), 90)?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Rasters, colors, blend configuration, errors and settings
//! - [`validation`]: Individual input checks and the final validation pipeline
//! - [`compositor`]: Per-pixel blending and tile placement
//! - [`io`]: Loading, saving and describing image files
//! - [`workflow`]: Interactive sessions and job files

#![warn(clippy::all)]

pub mod compositor;
pub mod core;
pub mod io;
pub mod validation;
pub mod workflow;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use watermark::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Color, ImageMetadata, OutputFormat, Raster, RasterRole};

    // Configuration
    pub use crate::core::config::{
        BlendConfig, BlendConfigBuilder, DimensionMode, Placement, Weight,
    };
    pub use crate::core::settings::Settings;

    // Errors
    pub use crate::core::error::{
        ErrorKind, InputField, ValidationError, ValidationResult, WatermarkError, WatermarkResult,
    };

    // Validation
    pub use crate::validation::pipeline::{
        ValidationContext, ValidationPipeline, ValidationReport, ValidationStage, ValidationWarning,
    };

    // Compositing
    pub use crate::compositor::engine::{CompositeOptions, Compositor};
    pub use crate::compositor::progress::{ProgressCallback, ProgressTracker, ProgressUpdate};

    // I/O
    pub use crate::io::{load_raster, save_raster, ImageReport, Transparency};

    // Workflows
    pub use crate::workflow::{InteractiveSession, JobSpec, PreparedJob};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
