// src/config/loader.rs
//
// Layered JSON config loading. Each layer overlays the previous one key by
// key; layers whose file does not exist are skipped.

use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::FingerprintConfig;
use crate::error::{FingerprintError, Result};

pub const CONFIG_DEFAULT_FILE: &str = "config.json";
pub const CONFIG_DEVELOPMENT_FILE: &str = "config-development.json";

/// Ordered list of config files, lowest priority first
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    layers: Vec<PathBuf>,
    required: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// User config dir, then `config.json` and `config-development.json` in
    /// the working directory.
    pub fn standard() -> Self {
        let mut loader = Self::new();
        if let Some(dir) = dirs::config_dir() {
            loader = loader.layer(dir.join("audioprintr").join(CONFIG_DEFAULT_FILE));
        }
        loader
            .layer(CONFIG_DEFAULT_FILE)
            .layer(CONFIG_DEVELOPMENT_FILE)
    }

    /// Add an optional layer on top of the existing ones
    pub fn layer(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(path.into());
        self
    }

    /// Top-most layer that must exist
    pub fn required(mut self, path: impl Into<PathBuf>) -> Self {
        self.required = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<FingerprintConfig> {
        let mut merged = match serde_json::to_value(FingerprintConfig::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        for path in &self.layers {
            if let Some(layer) = parse_config(path, false)? {
                debug!("Applying config layer {}", path.display());
                merge_configs(&mut merged, layer);
            }
        }

        if let Some(path) = &self.required {
            if let Some(layer) = parse_config(path, true)? {
                debug!("Applying config file {}", path.display());
                merge_configs(&mut merged, layer);
            }
        }

        serde_json::from_value(Value::Object(merged)).map_err(|e| FingerprintError::Config {
            path: self
                .required
                .clone()
                .or_else(|| self.layers.last().cloned())
                .unwrap_or_default(),
            reason: e.to_string(),
        })
    }
}

/// Read one config file as a JSON object.
///
/// Returns `Ok(None)` for a missing optional file.
fn parse_config(path: &Path, required: bool) -> Result<Option<Map<String, Value>>> {
    if !path.is_file() {
        if required {
            return Err(FingerprintError::Config {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }
        return Ok(None);
    }

    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| FingerprintError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(FingerprintError::Config {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        }),
    }
}

/// Shallow overlay: keys in `layer` replace keys in `base`
fn merge_configs(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        base.insert(key, value);
    }
}
