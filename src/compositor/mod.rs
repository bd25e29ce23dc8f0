//! Compositing engine.
//!
//! Blends a watermark raster over a base raster according to a resolved
//! [`BlendConfig`](crate::core::config::BlendConfig), either once or tiled.

pub mod blend;
pub mod engine;
pub mod progress;
pub mod tiling;

pub use blend::{blend_channel, blend_pixel, is_transparent};
pub use engine::{CompositeOptions, Compositor};
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
pub use tiling::{placement_origins, tile_origins};
