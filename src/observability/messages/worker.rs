// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the parser worker pool.

use crate::errors::RecordError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Worker task started.
///
/// # Log Level
/// `debug!`
pub struct WorkerStarted<'a> {
    pub worker_id: usize,
    pub parser: &'a str,
}

impl Display for WorkerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} started with parser '{}'", self.worker_id, self.parser)
    }
}

impl StructuredLog for WorkerStarted<'_> {
    fn log(&self) {
        tracing::debug!(worker_id = self.worker_id, parser = self.parser, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker",
            span_name = name,
            worker_id = self.worker_id,
            parser = self.parser,
        )
    }
}

/// A record was discarded by the validator or a worker.
///
/// # Log Level
/// `warn!` - malformed input is expected and recoverable
///
/// # Example
/// ```
/// use the_tally::errors::RecordError;
/// use the_tally::observability::messages::worker::RecordDropped;
///
/// let error = RecordError::WrongWidth {
///     expected: 15,
///     actual: 3,
///     record: vec!["Acme".into(), "Sedan".into(), "10.5".into()],
/// };
/// let msg = RecordDropped { stage: "validator", line: 7, error: &error };
/// assert!(msg.to_string().starts_with("validator dropped line 7"));
/// ```
pub struct RecordDropped<'a> {
    pub stage: &'a str,
    pub line: u64,
    pub error: &'a RecordError,
}

impl Display for RecordDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} dropped line {}: {}", self.stage, self.line, self.error)
    }
}

impl StructuredLog for RecordDropped<'_> {
    fn log(&self) {
        match self.error {
            RecordError::WrongWidth {
                expected, actual, ..
            } => tracing::warn!(
                stage = self.stage,
                line = self.line,
                kind = self.error.kind(),
                expected_width = *expected,
                actual_width = *actual,
                "{}", self
            ),
            RecordError::InvalidField { field, value, .. } => tracing::warn!(
                stage = self.stage,
                line = self.line,
                kind = self.error.kind(),
                field = *field,
                value = value.as_str(),
                "{}", self
            ),
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "record_dropped",
            span_name = name,
            stage = self.stage,
            line = self.line,
            kind = self.error.kind(),
        )
    }
}

/// Worker task exited.
pub struct WorkerFinished {
    pub worker_id: usize,
    pub parsed: u64,
    pub dropped: u64,
    pub cancelled: bool,
}

impl Display for WorkerFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let reason = if self.cancelled { "cancelled" } else { "input drained" };
        write!(
            f,
            "Worker {} finished ({}): parsed={}, dropped={}",
            self.worker_id, reason, self.parsed, self.dropped
        )
    }
}

impl StructuredLog for WorkerFinished {
    fn log(&self) {
        tracing::debug!(
            worker_id = self.worker_id,
            parsed = self.parsed,
            dropped = self.dropped,
            cancelled = self.cancelled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "worker_finished",
            span_name = name,
            worker_id = self.worker_id,
        )
    }
}

/// Every worker joined; the pool's output is closed.
///
/// # Log Level
/// `info!`
pub struct PoolDrained {
    pub workers: usize,
    pub parsed: u64,
    pub dropped: u64,
}

impl Display for PoolDrained {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "All {} workers joined: parsed={}, dropped={}",
            self.workers, self.parsed, self.dropped
        )
    }
}

impl StructuredLog for PoolDrained {
    fn log(&self) {
        tracing::info!(
            workers = self.workers,
            parsed = self.parsed,
            dropped = self.dropped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("pool_drained", span_name = name, workers = self.workers)
    }
}
