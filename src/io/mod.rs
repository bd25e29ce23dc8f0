//! File I/O around the compositor.
//!
//! Loading and saving delegate all codec work to the `image` crate; this
//! module only adds the existence, extension and metadata handling.

pub mod loader;
pub mod report;
pub mod writer;

pub use loader::load_raster;
pub use report::{ImageReport, Transparency};
pub use writer::save_raster;
