//! Validation module for pre-compositing checks.
//!
//! [`rules`] holds the individual checks used while parameters are being
//! collected; [`pipeline`] re-runs the raster-dependent ones as a final gate.

pub mod pipeline;
pub mod rules;

pub use pipeline::{
    ColorDepthValidation, DimensionValidation, OutputValidation, PlacementValidation,
    TransparencyValidation, ValidationContext, ValidationPipeline, ValidationReport,
    ValidationStage, ValidationWarning,
};
pub use rules::{
    validate_color_depth, validate_dimensions, validate_output_path, validate_placement,
    validate_transparency_color, validate_weight,
};
