// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and saving
//! pipeline preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use geotag_lens::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.target_precision = Some(9);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.target_precision, Some(9));
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

pub use defaults::*;

use crate::correction::PipelineSettings;
use crate::domain::geo::{GeohashPrecision, MaxCorrections};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "GeotagLens";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub precision_threshold: Option<u8>,
    #[serde(default)]
    pub target_precision: Option<u8>,
    #[serde(default)]
    pub max_corrections: Option<usize>,
    #[serde(default)]
    pub apply_threshold: Option<f64>,
    #[serde(default)]
    pub min_exif_bytes: Option<usize>,
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision_threshold: Some(DEFAULT_PRECISION_THRESHOLD),
            target_precision: Some(DEFAULT_TARGET_PRECISION),
            max_corrections: Some(DEFAULT_MAX_CORRECTIONS),
            apply_threshold: Some(DEFAULT_APPLY_THRESHOLD),
            min_exif_bytes: Some(DEFAULT_MIN_EXIF_BYTES),
            fetch_timeout_secs: Some(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Resolves the optional settings into values the pipeline can use.
    ///
    /// Out-of-range values are clamped by the domain newtypes; a non-finite
    /// apply threshold falls back to the default.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let apply_threshold = self
            .apply_threshold
            .filter(|t| t.is_finite())
            .map_or(DEFAULT_APPLY_THRESHOLD, |t| t.clamp(0.0, 1.0));

        PipelineSettings {
            precision_threshold: self
                .precision_threshold
                .map(GeohashPrecision::new)
                .unwrap_or_else(GeohashPrecision::default_threshold),
            target_precision: self
                .target_precision
                .map(GeohashPrecision::new)
                .unwrap_or_default(),
            max_corrections: self
                .max_corrections
                .map(MaxCorrections::new)
                .unwrap_or_default(),
            apply_threshold,
            min_exif_bytes: self.min_exif_bytes.unwrap_or(DEFAULT_MIN_EXIF_BYTES),
        }
    }

    /// Timeout handed to the photo fetcher.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        let secs = self
            .fetch_timeout_secs
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
            .clamp(MIN_FETCH_TIMEOUT_SECS, MAX_FETCH_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
