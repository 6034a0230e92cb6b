//! Application configuration.
//!
//! Loads settings from config.json. Provides file locations for the record
//! store and exports, and the accepted tier/wave ranges.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ocr::{FieldLimits, IntRange};
use crate::paths;

/// Complete application configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record store snapshot (relative paths resolve against the data directory)
    #[serde(default = "default_store_file")]
    pub store_file: String,
    /// Every ingested screenshot with its OCR text and outcome
    #[serde(default = "default_archive_file")]
    pub archive_file: String,
    /// CSV export of all stored runs
    #[serde(default = "default_export_csv")]
    pub export_csv: String,
    /// Statistics JSON written by `export`
    #[serde(default = "default_statistics_json")]
    pub statistics_json: String,
    /// Accepted tier values
    #[serde(default = "default_tier_range")]
    pub tier_range: IntRange,
    /// Accepted wave values
    #[serde(default = "default_wave_range")]
    pub wave_range: IntRange,
}

fn default_store_file() -> String {
    "stats.json".to_string()
}

fn default_archive_file() -> String {
    "archive.json".to_string()
}

fn default_export_csv() -> String {
    "runs.csv".to_string()
}

fn default_statistics_json() -> String {
    "statistics.json".to_string()
}

fn default_tier_range() -> IntRange {
    FieldLimits::default().tier
}

fn default_wave_range() -> IntRange {
    FieldLimits::default().wave
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            archive_file: default_archive_file(),
            export_csv: default_export_csv(),
            statistics_json: default_statistics_json(),
            tier_range: default_tier_range(),
            wave_range: default_wave_range(),
        }
    }
}

impl AppConfig {
    pub fn limits(&self) -> FieldLimits {
        FieldLimits {
            tier: self.tier_range,
            wave: self.wave_range,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        paths::resolve_data_path(&self.store_file)
    }

    pub fn archive_path(&self) -> PathBuf {
        paths::resolve_data_path(&self.archive_file)
    }

    pub fn export_csv_path(&self) -> PathBuf {
        paths::resolve_data_path(&self.export_csv)
    }

    pub fn statistics_json_path(&self) -> PathBuf {
        paths::resolve_data_path(&self.statistics_json)
    }
}

/// Loads configuration from `config_path` or returns defaults.
pub fn load_config(config_path: &Path) -> AppConfig {
    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    AppConfig::default()
}
