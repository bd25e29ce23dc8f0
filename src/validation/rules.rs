//! Individual validation rules.
//!
//! Each rule is a pure function returning the typed value it validated or
//! the [`ValidationError`] naming the check that failed. Text parsers take
//! the raw line the user typed; the numeric variants are used by job files.

use crate::core::config::{DimensionMode, Placement, Weight};
use crate::core::error::{ColorDepthIssue, InputField, ValidationError, ValidationResult};
use crate::core::types::{Color, OutputFormat, Raster, RasterRole};
use std::path::Path;

/// Bits per pixel accepted for both inputs.
pub const SUPPORTED_BITS_PER_PIXEL: [u16; 2] = [24, 32];

/// Number of color components both inputs must have.
pub const REQUIRED_COLOR_COMPONENTS: u8 = 3;

/// Check the size relation between base and watermark.
pub fn validate_dimensions(
    base: &Raster,
    watermark: &Raster,
    mode: DimensionMode,
) -> ValidationResult<()> {
    let image = base.dimensions();
    let mark = watermark.dimensions();

    match mode {
        DimensionMode::Fit if mark.0 > image.0 || mark.1 > image.1 => {
            Err(ValidationError::DimensionTooLarge {
                image,
                watermark: mark,
            })
        }
        DimensionMode::ExactMatch if mark != image => Err(ValidationError::DimensionMismatch {
            image,
            watermark: mark,
        }),
        _ => Ok(()),
    }
}

/// Require three color components at 24 or 32 bits per pixel.
///
/// The component count is checked before the bit depth.
pub fn validate_color_depth(raster: &Raster, role: RasterRole) -> ValidationResult<()> {
    let layout = raster.metadata.layout;

    if layout.color_components != REQUIRED_COLOR_COMPONENTS {
        return Err(ValidationError::UnsupportedColorDepth {
            role,
            issue: ColorDepthIssue::ColorComponents {
                found: layout.color_components,
            },
        });
    }

    if !SUPPORTED_BITS_PER_PIXEL.contains(&layout.bits_per_pixel) {
        return Err(ValidationError::UnsupportedColorDepth {
            role,
            issue: ColorDepthIssue::BitsPerPixel {
                found: layout.bits_per_pixel,
            },
        });
    }

    Ok(())
}

/// Parse one integer token for `field`.
pub fn parse_integer(field: InputField, input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            input: input.to_string(),
        })
}

/// Parse whitespace-separated integers for `field`.
///
/// Every token must parse before the count is looked at.
fn parse_integers(field: InputField, input: &str) -> ValidationResult<Vec<i64>> {
    input
        .split_whitespace()
        .map(|token| parse_integer(field, token))
        .collect()
}

/// Parse and range-check the blend weight.
pub fn validate_weight(input: &str) -> ValidationResult<Weight> {
    let value = parse_integer(InputField::Weight, input)?;
    Weight::new(value)
}

/// Parse "R G B" into a transparency color.
pub fn validate_transparency_color(input: &str) -> ValidationResult<Color> {
    let components = parse_integers(InputField::TransparencyColor, input)?;
    transparency_color_from_components(&components)
}

/// Check arity and range of already-parsed color components.
pub fn transparency_color_from_components(components: &[i64]) -> ValidationResult<Color> {
    let [r, g, b] = components else {
        return Err(ValidationError::WrongArity {
            field: InputField::TransparencyColor,
            expected: 3,
            got: components.len(),
        });
    };

    let channel = |value: i64| {
        u8::try_from(value).map_err(|_| ValidationError::OutOfRange {
            field: InputField::TransparencyColor,
            value,
        })
    };

    Ok(Color::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

/// Largest valid top-left corner for a single placement.
///
/// Only meaningful once the watermark is known to fit.
pub fn max_position(base: &Raster, watermark: &Raster) -> (u32, u32) {
    (
        base.width().saturating_sub(watermark.width()),
        base.height().saturating_sub(watermark.height()),
    )
}

/// Range-check a single placement so the watermark lies fully inside the base.
pub fn validate_placement(
    x: i64,
    y: i64,
    base: &Raster,
    watermark: &Raster,
) -> ValidationResult<Placement> {
    let max_x = i64::from(base.width()) - i64::from(watermark.width());
    let max_y = i64::from(base.height()) - i64::from(watermark.height());

    for value in [x, y] {
        if value < 0 {
            return Err(ValidationError::OutOfRange {
                field: InputField::Position,
                value,
            });
        }
    }
    if x > max_x {
        return Err(ValidationError::OutOfRange {
            field: InputField::Position,
            value: x,
        });
    }
    if y > max_y {
        return Err(ValidationError::OutOfRange {
            field: InputField::Position,
            value: y,
        });
    }

    // Both values are within 0..=u32::MAX here.
    Ok(Placement::Single {
        x: x as u32,
        y: y as u32,
    })
}

/// Parse "X Y" and range-check it as a single placement.
pub fn parse_placement(
    input: &str,
    base: &Raster,
    watermark: &Raster,
) -> ValidationResult<Placement> {
    let values = parse_integers(InputField::Position, input)?;
    let &[x, y] = values.as_slice() else {
        return Err(ValidationError::WrongArity {
            field: InputField::Position,
            expected: 2,
            got: values.len(),
        });
    };
    validate_placement(x, y, base, watermark)
}

/// Require a `.jpg` or `.png` output file name.
pub fn validate_output_path(path: &Path) -> ValidationResult<OutputFormat> {
    OutputFormat::from_path(path).ok_or_else(|| ValidationError::InvalidOutputExtension {
        filename: path.display().to_string(),
    })
}

/// Require an existing input file.
pub fn validate_input_path(path: &Path) -> ValidationResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ValidationError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}
