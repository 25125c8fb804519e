// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Range checks for [`PipelineConfig`]. All violations are collected so the
//! caller sees every problem at once rather than fixing them one at a time.

use crate::config::PipelineConfig;
use crate::errors::ValidationError;

impl PipelineConfig {
    /// Validate the configuration against the parser's schema width.
    pub fn validate(&self, expected_schema_width: usize) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let minimums: [(&'static str, u64); 4] = [
            ("workers", self.workers as u64),
            ("deadline_ms", self.deadline_ms),
            ("queue_capacity", self.queue_capacity as u64),
            ("bucket_width", u64::from(self.bucket_width)),
        ];
        for (field, actual) in minimums {
            if actual < 1 {
                errors.push(ValidationError::BelowMinimum {
                    field,
                    minimum: 1,
                    actual,
                });
            }
        }

        if self.schema_width != expected_schema_width {
            errors.push(ValidationError::SchemaMismatch {
                configured: self.schema_width,
                expected: expected_schema_width,
            });
        }

        if self.delimiter.len() != 1 || !self.delimiter.is_ascii() {
            errors.push(ValidationError::InvalidDelimiter(self.delimiter.clone()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
