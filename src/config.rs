//! Run settings.
//!
//! Settings come from a TOML file when one is found, otherwise from
//! built-in defaults. The two data directories can always be overridden
//! from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::filter::{DEFAULT_IQR_MULTIPLIER, ThresholdSpec};
use crate::error::PrepError;

/// Names the config file explicitly.
pub const CONFIG_ENV: &str = "FRAUD_PREP_CONFIG";
pub const DATA_RAW_ENV: &str = "DATA_RAW";
pub const DATA_TRANSFORMED_ENV: &str = "DATA_TRANSFORMED";

const CONFIG_FILE: &str = "fraud_prep.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the downloaded dataset.
    pub data_raw: PathBuf,
    /// Directory the cleaned dataset is written to.
    pub data_transformed: PathBuf,
    /// File name, identical in both directories.
    pub dataset_file: String,
    pub class_column: String,
    pub minority_label: i64,
    pub features: Vec<String>,
    pub iqr_multiplier: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let spec = ThresholdSpec::default();
        Self {
            data_raw: PathBuf::from("data/raw"),
            data_transformed: PathBuf::from("data/transformed"),
            dataset_file: "creditcard.csv".into(),
            class_column: spec.class_column,
            minority_label: spec.minority_label,
            features: spec.features,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PrepError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PrepError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read config file: {e}"),
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|e| PrepError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse config file: {e}"),
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Resolve settings the way the binary does.
    ///
    /// Searches for the file named by `FRAUD_PREP_CONFIG`, then for
    /// `fraud_prep.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults, then applies `DATA_RAW` / `DATA_TRANSFORMED`.
    pub fn resolve() -> Result<Self, PrepError> {
        let mut settings = match Self::locate() {
            Some(path) => {
                log::info!("Using configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                log::debug!("No {CONFIG_FILE} found, using defaults");
                Self::default()
            }
        };
        settings.apply_overrides(
            std::env::var_os(DATA_RAW_ENV).map(PathBuf::from),
            std::env::var_os(DATA_TRANSFORMED_ENV).map(PathBuf::from),
        );
        Ok(settings)
    }

    fn locate() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        [
            PathBuf::from(CONFIG_FILE),
            Path::new("config").join(CONFIG_FILE),
            Path::new("..").join(CONFIG_FILE),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    pub fn apply_overrides(&mut self, raw: Option<PathBuf>, transformed: Option<PathBuf>) {
        if let Some(raw) = raw {
            self.data_raw = raw;
        }
        if let Some(transformed) = transformed {
            self.data_transformed = transformed;
        }
    }

    fn validate(&self, path: &Path) -> Result<(), PrepError> {
        let invalid = |message: &str| PrepError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.features.is_empty() {
            return Err(invalid("'features' must name at least one column"));
        }
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier >= 0.0) {
            return Err(invalid("'iqr_multiplier' must be a non-negative number"));
        }
        if self.dataset_file.is_empty() {
            return Err(invalid("'dataset_file' must not be empty"));
        }
        Ok(())
    }

    pub fn raw_path(&self) -> PathBuf {
        self.data_raw.join(&self.dataset_file)
    }

    pub fn transformed_path(&self) -> PathBuf {
        self.data_transformed.join(&self.dataset_file)
    }

    pub fn threshold_spec(&self) -> ThresholdSpec {
        ThresholdSpec {
            features: self.features.clone(),
            class_column: self.class_column.clone(),
            minority_label: self.minority_label,
            iqr_multiplier: self.iqr_multiplier,
        }
    }
}
