//! Runtime settings.
//!
//! Settings come from an optional TOML file and a couple of environment
//! overrides. Everything has a default so the tool runs without a file.

use crate::core::error::{WatermarkError, WatermarkResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "watermark.toml";

/// Environment variable overriding [`Settings::parallel`].
pub const PARALLEL_ENV: &str = "WATERMARK_PARALLEL";

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Composite rows on the rayon pool.
    pub parallel: bool,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Quality used when writing JPEG output (1-100).
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallel: true,
            log_filter: "info".to_string(),
            jpeg_quality: 90,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> WatermarkResult<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.check()?;
        Ok(settings)
    }

    /// Load settings from `path`.
    pub fn from_file(path: &Path) -> WatermarkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from an explicit path, else from [`DEFAULT_SETTINGS_FILE`] if it
    /// exists, else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> WatermarkResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(value) = std::env::var(PARALLEL_ENV) {
            settings.apply_parallel_override(&value)?;
        }

        Ok(settings)
    }

    fn apply_parallel_override(&mut self, value: &str) -> WatermarkResult<()> {
        self.parallel = match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(WatermarkError::Other(format!(
                    "{} must be true or false, got '{}'",
                    PARALLEL_ENV, other
                )))
            }
        };
        Ok(())
    }

    fn check(&self) -> WatermarkResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(WatermarkError::Other(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.parallel);
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.jpeg_quality, 90);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("parallel = false").unwrap();
        assert!(!settings.parallel);
        assert_eq!(settings.jpeg_quality, 90);
    }

    #[test]
    fn test_rejects_bad_quality() {
        assert!(Settings::from_toml("jpeg_quality = 0").is_err());
        assert!(matches!(
            Settings::from_toml("jpeg_quality = \"high\""),
            Err(WatermarkError::Toml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter = \"debug\"").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn test_parallel_override() {
        let mut settings = Settings::default();
        settings.apply_parallel_override("0").unwrap();
        assert!(!settings.parallel);
        settings.apply_parallel_override("TRUE").unwrap();
        assert!(settings.parallel);
        assert!(settings.apply_parallel_override("maybe").is_err());
    }
}
