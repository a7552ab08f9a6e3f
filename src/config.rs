//! Analysis Configuration Module
//! Fixed defaults for the walkthrough, optionally overridden by `eda.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory for overrides.
pub const CONFIG_FILE: &str = "eda.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Order of the categories along the box plot x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthOrder {
    /// Order in which values first appear in the table
    #[default]
    Appearance,
    /// Jan..Dec, unknown labels last
    Calendar,
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub date_column: String,
    pub value_column: String,
    /// Rows printed right after loading
    pub head_rows: usize,
    /// Rows printed after each derived column
    pub preview_rows: usize,
    pub figure_path: PathBuf,
    pub figure_size: (u32, u32),
    pub month_order: MonthOrder,
    pub show_window: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw/MOCK_DATA.csv"),
            date_column: "date".to_string(),
            value_column: "401k_amount".to_string(),
            head_rows: 10,
            preview_rows: 5,
            figure_path: PathBuf::from("reports/figures/401k_amount_by_month.png"),
            figure_size: (1200, 400),
            month_order: MonthOrder::Appearance,
            show_window: true,
        }
    }
}

impl AnalysisConfig {
    /// Load overrides from `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AnalysisConfig::load_or_default(&dir.path().join(CONFIG_FILE))?;
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.value_column, "401k_amount");
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{ "value_column": "amount", "month_order": "calendar", "show_window": false }}"#
        )?;

        let config = AnalysisConfig::load_or_default(file.path())?;
        assert_eq!(config.value_column, "amount");
        assert_eq!(config.month_order, MonthOrder::Calendar);
        assert!(!config.show_window);
        assert_eq!(config.date_column, "date");
        assert_eq!(config.figure_size, (1200, 400));
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{{ not json")?;

        let err = AnalysisConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        Ok(())
    }
}
