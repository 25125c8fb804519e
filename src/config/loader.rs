// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BUCKET_WIDTH, DEFAULT_DEADLINE_MS, DEFAULT_DELIMITER, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_WORKERS, REFERENCE_SCHEMA_WIDTH,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Run configuration for a single pipeline execution.
///
/// Every field is optional in the file; missing fields fall back to the
/// constants in [`crate::config::consts`].
///
/// # Example
/// ```yaml
/// workers: 4
/// deadline_ms: 2000
/// queue_capacity: 100
/// bucket_width: 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub deadline_ms: u64,
    pub queue_capacity: usize,
    pub bucket_width: u32,
    pub schema_width: usize,
    pub delimiter: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            deadline_ms: DEFAULT_DEADLINE_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            bucket_width: DEFAULT_BUCKET_WIDTH,
            schema_width: REFERENCE_SCHEMA_WIDTH,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = deadline.as_millis() as u64;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_bucket_width(mut self, width: u32) -> Self {
        self.bucket_width = width;
        self
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Delimiter as a byte. Only meaningful after `validate` has passed.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(DEFAULT_DELIMITER as u8)
    }
}

/// Load a config from a YAML or TOML file, chosen by extension
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a config and reject it unless every rule in `PipelineConfig::validate` holds
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate(REFERENCE_SCHEMA_WIDTH)
        .map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
