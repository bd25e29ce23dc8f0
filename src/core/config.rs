//! Resolved blend parameters.
//!
//! A [`BlendConfig`] is what the compositor consumes. Building one through
//! [`BlendConfig::builder`] enforces the rules that do not depend on the
//! rasters (weight range, alpha vs. transparency color); rules that do
//! (dimensions, placement bounds) are checked by the validation module.

use crate::core::error::{InputField, ValidationError};
use crate::core::types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blend weight as a percentage, guaranteed to be within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Weight(u8);

impl Weight {
    pub const MIN: Weight = Weight(0);
    pub const MAX: Weight = Weight(100);

    /// Create a weight, rejecting values outside 0..=100.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::OutOfRange {
                field: InputField::Weight,
                value,
            })
        }
    }

    /// Percentage value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Weight {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for i64 {
    fn from(weight: Weight) -> Self {
        i64::from(weight.0)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// How the watermark is laid over the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Placement {
    /// One copy with its top-left corner at (x, y).
    Single { x: u32, y: u32 },
    /// Repeated from (0, 0) every watermark width/height, edge tiles clipped.
    Grid,
}

impl Placement {
    /// Parse a placement method name. `Single` starts at the origin; callers
    /// fill in the coordinates afterwards.
    pub fn parse_method(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "single" => Ok(Placement::Single { x: 0, y: 0 }),
            "grid" => Ok(Placement::Grid),
            other => Err(ValidationError::InvalidPlacementMethod {
                input: other.to_string(),
            }),
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Single { x: 0, y: 0 }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Single { x, y } => write!(f, "single at ({}, {})", x, y),
            Placement::Grid => write!(f, "grid"),
        }
    }
}

/// Size rule applied between base and watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionMode {
    /// Watermark must fit inside the base image.
    #[default]
    Fit,
    /// Watermark and base must have identical sizes.
    ExactMatch,
}

/// Fully resolved parameters for one composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Share of the watermark in each blended channel.
    pub weight: Weight,
    /// Treat watermark pixels with alpha 0 as transparent.
    pub use_alpha: bool,
    /// Watermark color treated as transparent.
    pub transparency_color: Option<Color>,
    pub placement: Placement,
    pub dimension_mode: DimensionMode,
}

impl BlendConfig {
    /// Start building a config with the given weight.
    pub fn builder(weight: Weight) -> BlendConfigBuilder {
        BlendConfigBuilder::new(weight)
    }
}

/// Builder for [`BlendConfig`].
#[derive(Debug, Clone)]
pub struct BlendConfigBuilder {
    config: BlendConfig,
}

impl BlendConfigBuilder {
    pub fn new(weight: Weight) -> Self {
        Self {
            config: BlendConfig {
                weight,
                use_alpha: false,
                transparency_color: None,
                placement: Placement::default(),
                dimension_mode: DimensionMode::default(),
            },
        }
    }

    pub fn use_alpha(mut self, use_alpha: bool) -> Self {
        self.config.use_alpha = use_alpha;
        self
    }

    pub fn transparency_color(mut self, color: Option<Color>) -> Self {
        self.config.transparency_color = color;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.config.placement = placement;
        self
    }

    pub fn dimension_mode(mut self, mode: DimensionMode) -> Self {
        self.config.dimension_mode = mode;
        self
    }

    /// Finish the config. Alpha usage and a transparency color exclude each
    /// other.
    pub fn build(self) -> Result<BlendConfig, ValidationError> {
        if self.config.use_alpha && self.config.transparency_color.is_some() {
            return Err(ValidationError::ConflictingTransparency);
        }
        Ok(self.config)
    }
}
