// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the record source and validator stage.
//!
//! This module contains message types for logging events related to:
//! * Header consumption
//! * Per-line read failures (skipped or stream-ending)
//! * Upstream stage completion

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Header line consumed and discarded.
///
/// # Log Level
/// `debug!` when the header width matches the schema, `warn!` otherwise
pub struct HeaderSkipped<'a> {
    pub header: &'a [String],
    pub expected_width: usize,
}

impl Display for HeaderSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipped header with {} columns (schema expects {})",
            self.header.len(),
            self.expected_width
        )
    }
}

impl StructuredLog for HeaderSkipped<'_> {
    fn log(&self) {
        if self.header.len() == self.expected_width {
            tracing::debug!(
                header = ?self.header,
                width = self.header.len(),
                "{}", self
            );
        } else {
            tracing::warn!(
                header = ?self.header,
                width = self.header.len(),
                expected_width = self.expected_width,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "header_skipped",
            span_name = name,
            width = self.header.len(),
            expected_width = self.expected_width,
        )
    }
}

/// A single line could not be decoded and was skipped.
///
/// # Log Level
/// `warn!` - recoverable, the run continues
pub struct LineSkipped<'a> {
    pub line: Option<u64>,
    pub error: &'a csv::Error,
}

impl Display for LineSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "Skipping unreadable line {}: {}", line, self.error),
            None => write!(f, "Skipping unreadable line: {}", self.error),
        }
    }
}

impl StructuredLog for LineSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            line = self.line,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "line_skipped",
            span_name = name,
            line = self.line,
            error = %self.error,
        )
    }
}

/// The underlying stream failed mid-read; the source stops producing.
///
/// # Log Level
/// `error!` - the run completes with whatever was read so far
pub struct StreamBroken<'a> {
    pub records_read: u64,
    pub error: &'a csv::Error,
}

impl Display for StreamBroken<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Input stream failed after {} records: {}",
            self.records_read, self.error
        )
    }
}

impl StructuredLog for StreamBroken<'_> {
    fn log(&self) {
        tracing::error!(
            records_read = self.records_read,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stream_broken",
            span_name = name,
            records_read = self.records_read,
        )
    }
}

/// Upstream (source + validator) stage finished and closed its output.
///
/// # Log Level
/// `info!` - stage lifecycle
///
/// # Example
/// ```
/// use the_tally::observability::messages::source::UpstreamFinished;
///
/// let msg = UpstreamFinished { forwarded: 152, cancelled: false };
/// assert_eq!(msg.to_string(), "Upstream stage finished: 152 records forwarded");
/// ```
pub struct UpstreamFinished {
    pub forwarded: u64,
    pub cancelled: bool,
}

impl Display for UpstreamFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Upstream stage finished: {} records forwarded",
            self.forwarded
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

impl StructuredLog for UpstreamFinished {
    fn log(&self) {
        tracing::info!(
            forwarded = self.forwarded,
            cancelled = self.cancelled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "upstream_finished",
            span_name = name,
            forwarded = self.forwarded,
            cancelled = self.cancelled,
        )
    }
}
