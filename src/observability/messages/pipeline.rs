// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the pipeline orchestrator.
//!
//! This module contains message types for logging events related to:
//! * Run start with its configuration
//! * Phase transitions (`Idle -> Running -> Completed | TimedOut`, or `Aborted`)
//! * Deadline expiry
//! * Run completion

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_tally::observability::messages::pipeline::RunStarted;
/// use std::time::Duration;
///
/// let msg = RunStarted {
///     parser: "car_sales",
///     workers: 4,
///     queue_capacity: 100,
///     deadline: Duration::from_secs(5),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub parser: &'a str,
    pub workers: usize,
    pub queue_capacity: usize,
    pub deadline: Duration,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting '{}' pipeline: workers={}, queue_capacity={}, deadline={:?}",
            self.parser, self.workers, self.queue_capacity, self.deadline
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            parser = self.parser,
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            deadline_ms = self.deadline.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            parser = self.parser,
            workers = self.workers,
            deadline = ?self.deadline,
        )
    }
}

/// Orchestrator moved between phases.
///
/// # Log Level
/// `debug!`, or `error!` when entering `Aborted`
pub struct PhaseTransition<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for PhaseTransition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline phase {} -> {}", self.from, self.to)
    }
}

impl StructuredLog for PhaseTransition<'_> {
    fn log(&self) {
        if self.to == "Aborted" {
            tracing::error!(from = self.from, to = self.to, "{}", self);
        } else {
            tracing::debug!(from = self.from, to = self.to, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("phase_transition", span_name = name, from = self.from, to = self.to)
    }
}

/// The deadline tripped before the aggregator finished.
///
/// # Log Level
/// `warn!` - expected, the partial snapshot is still returned
pub struct DeadlineExpired {
    pub deadline: Duration,
    pub merged: u64,
}

impl Display for DeadlineExpired {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deadline of {:?} expired after {} merges; returning partial snapshot",
            self.deadline, self.merged
        )
    }
}

impl StructuredLog for DeadlineExpired {
    fn log(&self) {
        tracing::warn!(
            deadline_ms = self.deadline.as_millis() as u64,
            merged = self.merged,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("deadline_expired", span_name = name, merged = self.merged)
    }
}

/// Run reached a terminal status.
pub struct RunFinished<'a> {
    pub status: &'a str,
    pub records_read: u64,
    pub merged: u64,
    pub dropped: u64,
    pub duration: Duration,
}

impl Display for RunFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline {}: read={}, merged={}, dropped={} in {:?}",
            self.status, self.records_read, self.merged, self.dropped, self.duration
        )
    }
}

impl StructuredLog for RunFinished<'_> {
    fn log(&self) {
        tracing::info!(
            status = self.status,
            records_read = self.records_read,
            merged = self.merged,
            dropped = self.dropped,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_finished",
            span_name = name,
            status = self.status,
            duration = ?self.duration,
        )
    }
}
