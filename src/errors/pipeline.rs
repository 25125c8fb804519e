// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fatal pipeline errors. These only occur before the run reaches `Running`
//! (or when a stage task itself panics); per-record problems never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::errors::ConfigError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be opened
    #[error("cannot open input '{}': {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header line could not be read from the stream
    #[error("cannot read input header: {0}")]
    SourceUnreadable(#[from] csv::Error),

    /// The stream ended before a header line was seen
    #[error("input is empty: no header line")]
    MissingHeader,

    /// The run configuration failed validation
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A stage task panicked or was aborted
    #[error("pipeline stage '{stage}' did not finish: {reason}")]
    StageJoin { stage: &'static str, reason: String },
}
