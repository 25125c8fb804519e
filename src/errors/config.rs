// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A single rule violated by a `PipelineConfig`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("'{field}' must be at least {minimum}, got {actual}")]
    BelowMinimum {
        field: &'static str,
        minimum: u64,
        actual: u64,
    },

    #[error("'schema_width' is {configured} but the parser expects {expected} columns")]
    SchemaMismatch { configured: usize, expected: usize },

    #[error("'delimiter' must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
}

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config extension '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
