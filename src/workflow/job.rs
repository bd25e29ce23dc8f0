//! Prepared jobs and job files.
//!
//! A [`PreparedJob`] bundles two loaded rasters, a resolved config and an
//! output path that have passed the [`ValidationPipeline`]. It is the only
//! way the workflow layer reaches the compositor, so nothing is composited
//! or written before every check has passed.

use crate::compositor::Compositor;
use crate::core::config::{BlendConfig, DimensionMode, Placement, Weight};
use crate::core::error::{InputField, ValidationError, ValidationResult, WatermarkResult};
use crate::core::types::{Raster, RasterRole};
use crate::io::{load_raster, save_raster};
use crate::validation::pipeline::{ValidationContext, ValidationPipeline, ValidationReport};
use crate::validation::rules;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Validated inputs for one composite.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    base: Raster,
    watermark: Raster,
    config: BlendConfig,
    output: PathBuf,
    report: ValidationReport,
}

impl PreparedJob {
    /// Run the default validation pipeline and keep the inputs if it passes.
    pub fn new(
        base: Raster,
        watermark: Raster,
        config: BlendConfig,
        output: impl Into<PathBuf>,
    ) -> ValidationResult<Self> {
        let output = output.into();
        let report = ValidationPipeline::default().validate(&ValidationContext {
            base: &base,
            watermark: &watermark,
            config: &config,
            output: &output,
        })?;
        debug!("validation passed in {}ms", report.duration_ms);

        Ok(Self {
            base,
            watermark,
            config,
            output,
            report,
        })
    }

    pub fn base(&self) -> &Raster {
        &self.base
    }

    pub fn watermark(&self) -> &Raster {
        &self.watermark
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Report of the validation run that admitted this job.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Composite and write the result. Returns the output path.
    pub fn run(&self, compositor: &Compositor, jpeg_quality: u8) -> WatermarkResult<PathBuf> {
        let image = compositor.composite(&self.base, &self.watermark, &self.config);
        save_raster(&image, &self.output, jpeg_quality)?;
        info!("created {}", self.output.display());
        Ok(self.output.clone())
    }
}

fn default_placement() -> String {
    "single".to_string()
}

/// Non-interactive description of a job, read from TOML or JSON.
///
/// ```toml
/// image = "photo.png"
/// watermark = "logo.png"
/// output = "photo-marked.png"
/// weight = 40
/// transparency_color = [255, 255, 255]
/// placement = "single"
/// position = [10, 20]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub image: PathBuf,
    pub watermark: PathBuf,
    pub output: PathBuf,
    pub weight: i64,
    #[serde(default)]
    pub transparency_color: Option<Vec<i64>>,
    #[serde(default)]
    pub use_alpha: bool,
    #[serde(default = "default_placement")]
    pub placement: String,
    #[serde(default)]
    pub position: Option<Vec<i64>>,
    /// Require base and watermark to have identical sizes.
    #[serde(default)]
    pub exact_size: bool,
}

impl JobSpec {
    /// Parse a job from TOML text.
    pub fn from_toml(text: &str) -> WatermarkResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a job from JSON text.
    pub fn from_json(text: &str) -> WatermarkResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a job file. `.json` files are parsed as JSON, anything else as
    /// TOML. Relative paths inside the file are resolved against the file's
    /// directory.
    pub fn from_file(path: &Path) -> WatermarkResult<Self> {
        rules::validate_input_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let spec = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_toml(&text)?
        };

        Ok(match path.parent() {
            Some(dir) => spec.relative_to(dir),
            None => spec,
        })
    }

    /// Resolve relative paths against `dir`.
    pub fn relative_to(mut self, dir: &Path) -> Self {
        for path in [&mut self.image, &mut self.watermark, &mut self.output] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        self
    }

    /// Load both images and check every parameter, in the same order the
    /// interactive session asks for them.
    pub fn prepare(&self) -> WatermarkResult<PreparedJob> {
        let base = load_raster(&self.image)?;
        rules::validate_color_depth(&base, RasterRole::Image)?;
        let watermark = load_raster(&self.watermark)?;
        rules::validate_color_depth(&watermark, RasterRole::Watermark)?;

        let dimension_mode = if self.exact_size {
            DimensionMode::ExactMatch
        } else {
            DimensionMode::Fit
        };
        rules::validate_dimensions(&base, &watermark, dimension_mode)?;

        let transparency_color = self
            .transparency_color
            .as_deref()
            .map(rules::transparency_color_from_components)
            .transpose()?;
        let weight = Weight::new(self.weight)?;

        let placement = match Placement::parse_method(&self.placement)? {
            Placement::Single { .. } => {
                let position = self.position.as_deref().unwrap_or_default();
                let &[x, y] = position else {
                    return Err(ValidationError::WrongArity {
                        field: InputField::Position,
                        expected: 2,
                        got: position.len(),
                    }
                    .into());
                };
                rules::validate_placement(x, y, &base, &watermark)?
            }
            Placement::Grid => Placement::Grid,
        };
        rules::validate_output_path(&self.output)?;

        let config = BlendConfig::builder(weight)
            .use_alpha(self.use_alpha)
            .transparency_color(transparency_color)
            .placement(placement)
            .dimension_mode(dimension_mode)
            .build()?;

        Ok(PreparedJob::new(base, watermark, config, &self.output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::CompositeOptions;
    use crate::core::error::{ErrorKind, WatermarkError};
    use image::{ImageBuffer, Rgb, RgbImage};
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let base: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([200, 200, 200]));
        base.save(dir.path().join("base.png")).unwrap();
        let mark: RgbImage = ImageBuffer::from_pixel(2, 2, Rgb([255, 255, 255]));
        mark.save(dir.path().join("mark.png")).unwrap();
        let small: RgbImage = ImageBuffer::from_pixel(3, 3, Rgb([0, 0, 0]));
        small.save(dir.path().join("small.png")).unwrap();
        dir
    }

    fn spec(dir: &TempDir, extra: &str) -> JobSpec {
        let text = format!(
            "image = \"base.png\"\nwatermark = \"mark.png\"\noutput = \"out.png\"\n{}",
            extra
        );
        JobSpec::from_toml(&text).unwrap().relative_to(dir.path())
    }

    fn kind(err: WatermarkError) -> Option<ErrorKind> {
        err.as_validation().map(ValidationError::kind)
    }

    #[test]
    fn test_toml_defaults() {
        let spec = JobSpec::from_toml(
            "image = \"a.png\"\nwatermark = \"b.png\"\noutput = \"c.png\"\nweight = 10",
        )
        .unwrap();
        assert_eq!(spec.placement, "single");
        assert_eq!(spec.position, None);
        assert!(!spec.use_alpha);
        assert!(!spec.exact_size);
    }

    #[test]
    fn test_json_and_unknown_fields() {
        let spec = JobSpec::from_json(
            r#"{"image": "a.png", "watermark": "b.png", "output": "c.jpg",
                "weight": 5, "placement": "grid"}"#,
        )
        .unwrap();
        assert_eq!(spec.placement, "grid");

        let unknown = "image = \"a\"\nwatermark = \"b\"\noutput = \"c\"\nweight = 1\nopacity = 2";
        assert!(JobSpec::from_toml(unknown).is_err());
    }

    #[test]
    fn test_single_job_end_to_end() {
        let dir = fixture();
        let job = spec(&dir, "weight = 50\nposition = [0, 0]").prepare().unwrap();
        let compositor = Compositor::with_options(CompositeOptions::new().with_parallel(false));

        let written = job.run(&compositor, 90).unwrap();
        let out = image::open(&written).unwrap().into_rgb8();
        assert_eq!(*out.get_pixel(1, 1), Rgb([227, 227, 227]));
        assert_eq!(*out.get_pixel(2, 2), Rgb([200, 200, 200]));
    }

    #[test]
    fn test_masked_grid_job_leaves_base() {
        let dir = fixture();
        let job = spec(
            &dir,
            "weight = 50\nplacement = \"grid\"\ntransparency_color = [255, 255, 255]",
        )
        .prepare()
        .unwrap();

        let written = job.run(&Compositor::new(), 90).unwrap();
        let out = image::open(&written).unwrap().into_rgb8();
        assert!(out.pixels().all(|p| *p == Rgb([200, 200, 200])));
    }

    #[test]
    fn test_weight_out_of_range_writes_nothing() {
        let dir = fixture();
        let err = spec(&dir, "weight = 150\nposition = [0, 0]").prepare().unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::OutOfRange));
        assert!(!dir.path().join("out.png").exists());
    }

    #[test]
    fn test_exact_size_mismatch() {
        let dir = fixture();
        let mut job = spec(&dir, "weight = 50\nplacement = \"grid\"\nexact_size = true");
        job.watermark = dir.path().join("small.png");
        assert_eq!(kind(job.prepare().unwrap_err()), Some(ErrorKind::DimensionMismatch));
    }

    #[test]
    fn test_single_requires_position() {
        let dir = fixture();
        let err = spec(&dir, "weight = 50").prepare().unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::WrongArity));
    }

    #[test]
    fn test_bad_method_and_extension() {
        let dir = fixture();
        let err = spec(&dir, "weight = 50\nplacement = \"diagonal\"").prepare().unwrap_err();
        assert_eq!(kind(err), Some(ErrorKind::InvalidPlacementMethod));

        let mut job = spec(&dir, "weight = 50\nplacement = \"grid\"");
        job.output = dir.path().join("out.tiff");
        assert_eq!(kind(job.prepare().unwrap_err()), Some(ErrorKind::InvalidOutputExtension));
    }

    #[test]
    fn test_missing_image() {
        let dir = fixture();
        let mut job = spec(&dir, "weight = 50");
        job.image = dir.path().join("nope.png");
        assert_eq!(kind(job.prepare().unwrap_err()), Some(ErrorKind::FileNotFound));
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = fixture();
        let path = dir.path().join("job.toml");
        std::fs::write(
            &path,
            concat!(
                "image = \"base.png\"\nwatermark = \"mark.png\"\noutput = \"out.jpg\"\n",
                "weight = 20\nplacement = \"grid\"\n",
            ),
        )
        .unwrap();

        let spec = JobSpec::from_file(&path).unwrap();
        assert_eq!(spec.image, dir.path().join("base.png"));
        assert!(spec.prepare().is_ok());
    }
}
