// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-record errors. Every variant is recoverable: the offending record is
//! dropped and logged, the run continues.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// The record does not have the schema's field count
    #[error("expected {expected} fields, got {actual}: {record:?}")]
    WrongWidth {
        expected: usize,
        actual: usize,
        record: Vec<String>,
    },

    /// A single field failed type coercion, so the whole record is discarded
    #[error("field '{field}' has invalid value '{value}' ({reason}): {record:?}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
        record: Vec<String>,
    },
}

impl RecordError {
    /// Short machine-friendly tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::WrongWidth { .. } => "wrong_width",
            RecordError::InvalidField { .. } => "invalid_field",
        }
    }
}
