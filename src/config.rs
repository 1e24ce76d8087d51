//! CLI configuration module.
//!
//! Handles loading, validating, and merging `pixit.toml`. The file is sparse:
//! stock defaults are overridden by whatever keys the user sets, and command
//! line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [save]
//! output_path = ""               # Required at save time (flag or config)
//! filename_prefix = "Pixit"
//! filename_delimiter = "_"
//! filename_number_padding = 4    # 1-9 digits
//! filename_number_start = false  # true: 0001_Pixit.png
//! extension = "png"              # png, jpg, jpeg, gif, tiff, bmp
//! dpi = 300                      # 1-2400, JPEG only
//! quality = 95                   # 1-100, JPEG/TIFF
//! optimize_image = true
//! prompt = ""                    # Embedded in PNG output when set
//!
//! [logging]
//! level = "info"                 # Overridden by RUST_LOG
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::nodes::SaveOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "pixit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `pixit.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixitConfig {
    /// Defaults for the image saver.
    pub save: SaveOptions,
    /// Log filter used when `RUST_LOG` is unset.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PixitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let save = &self.save;
        if !(1..=9).contains(&save.filename_number_padding) {
            return Err(ConfigError::Validation(
                "save.filename_number_padding must be 1-9".into(),
            ));
        }
        if !(1..=2400).contains(&save.dpi) {
            return Err(ConfigError::Validation("save.dpi must be 1-2400".into()));
        }
        if !(1..=100).contains(&save.quality) {
            return Err(ConfigError::Validation("save.quality must be 1-100".into()));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PixitConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PixitConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PixitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<PixitConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `pixit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Pixit Configuration
# ===================
# Every key is optional. Command line flags override these values.

[save]
# Directory images are written to. Created if missing.
output_path = ""

# Filenames look like <prefix><delimiter><counter>.<extension>,
# e.g. Pixit_0001.png. The counter continues from the highest one
# already present in the directory.
filename_prefix = "Pixit"
filename_delimiter = "_"

# Minimum digits in the counter (1-9).
filename_number_padding = 4

# Put the counter first: 0001_Pixit.png
filename_number_start = false

# One of: png, jpg, jpeg, gif, tiff, bmp. Anything else saves as png.
extension = "png"

# JPEG density header (1-2400).
dpi = 300

# JPEG/TIFF quality (1-100).
quality = 95

# Best compression for PNG.
optimize_image = true

# Stored as a "prompt" text field in PNG files when not blank.
prompt = ""

[logging]
# Log filter used when RUST_LOG is unset (error, warn, info, debug, trace).
level = "info"
"##
}
