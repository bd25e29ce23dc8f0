//! Validation pipeline implementation.
//!
//! The pipeline is the last gate before compositing: it re-checks a fully
//! resolved [`BlendConfig`] against the two rasters and the output path, and
//! stops at the first failing stage.

use crate::core::config::{BlendConfig, DimensionMode, Placement};
use crate::core::error::{ValidationError, ValidationResult};
use crate::core::types::{Raster, RasterRole};
use crate::validation::rules;
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Everything a stage may look at.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub base: &'a Raster,
    pub watermark: &'a Raster,
    pub config: &'a BlendConfig,
    pub output: &'a Path,
}

/// Non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Suggestion for addressing the warning.
    pub suggestion: Option<String>,
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Names of the stages that ran, in order.
    pub stages: Vec<String>,
    /// Warnings raised along the way.
    pub warnings: Vec<ValidationWarning>,
    /// Time taken for validation in milliseconds.
    pub duration_ms: u64,
}

/// Trait for validation stages.
pub trait ValidationStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &str;

    /// Returns warnings on success, or the first error found.
    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>>;
}

/// Both rasters must be 3-component, 24 or 32-bit images.
pub struct ColorDepthValidation;

impl ValidationStage for ColorDepthValidation {
    fn name(&self) -> &str {
        "Color Depth Validation"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>> {
        rules::validate_color_depth(ctx.base, RasterRole::Image)?;
        rules::validate_color_depth(ctx.watermark, RasterRole::Watermark)?;
        Ok(Vec::new())
    }
}

/// Size relation between base and watermark.
///
/// Grid placement uses the same rule as single placement; a grid over an
/// equally sized base is simply a single tile.
pub struct DimensionValidation;

impl ValidationStage for DimensionValidation {
    fn name(&self) -> &str {
        "Dimension Validation"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>> {
        rules::validate_dimensions(ctx.base, ctx.watermark, ctx.config.dimension_mode)?;
        Ok(Vec::new())
    }
}

/// A single placement must keep the watermark fully inside the base.
pub struct PlacementValidation;

impl ValidationStage for PlacementValidation {
    fn name(&self) -> &str {
        "Placement Validation"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        match ctx.config.placement {
            Placement::Single { x, y } => {
                rules::validate_placement(i64::from(x), i64::from(y), ctx.base, ctx.watermark)?;
            }
            Placement::Grid if ctx.config.dimension_mode == DimensionMode::ExactMatch => {
                warnings.push(ValidationWarning {
                    message: "Grid placement over an equally sized image is a single tile"
                        .to_string(),
                    suggestion: Some("Use single placement at 0 0".to_string()),
                });
            }
            Placement::Grid => {}
        }

        Ok(warnings)
    }
}

/// Alpha usage and transparency color against what the watermark offers.
pub struct TransparencyValidation;

impl ValidationStage for TransparencyValidation {
    fn name(&self) -> &str {
        "Transparency Validation"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>> {
        let config = ctx.config;
        let has_alpha = ctx.watermark.has_alpha();

        if config.use_alpha && config.transparency_color.is_some() {
            return Err(ValidationError::ConflictingTransparency);
        }
        if config.transparency_color.is_some() && has_alpha {
            return Err(ValidationError::ConflictingTransparency);
        }

        let mut warnings = Vec::new();
        if config.use_alpha && !has_alpha {
            warnings.push(ValidationWarning {
                message: "The watermark has no alpha channel; every pixel is opaque".to_string(),
                suggestion: Some("Use a transparency color instead".to_string()),
            });
        }
        Ok(warnings)
    }
}

/// Output file name must select a writable format.
pub struct OutputValidation;

impl ValidationStage for OutputValidation {
    fn name(&self) -> &str {
        "Output Validation"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<Vec<ValidationWarning>> {
        rules::validate_output_path(ctx.output)?;
        Ok(Vec::new())
    }
}

/// Multi-stage, fail-fast validation pipeline.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ValidationPipeline {
    /// Create a new pipeline with the given stages.
    pub fn new(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// Create the default validation pipeline with all standard stages.
    pub fn default_pipeline() -> Self {
        Self {
            stages: vec![
                Box::new(ColorDepthValidation),
                Box::new(DimensionValidation),
                Box::new(TransparencyValidation),
                Box::new(PlacementValidation),
                Box::new(OutputValidation),
            ],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    /// Run every stage in order, stopping at the first error.
    pub fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult<ValidationReport> {
        let start = Instant::now();
        let mut report = ValidationReport::default();

        for stage in &self.stages {
            debug!("running {}", stage.name());
            let warnings = stage.validate(ctx).map_err(|error| {
                debug!("{} failed: {:?}", stage.name(), error);
                error
            })?;

            for warning in warnings {
                warn!("{}", warning.message);
                report.warnings.push(warning);
            }
            report.stages.push(stage.name().to_string());
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
