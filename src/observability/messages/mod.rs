// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its documented level with structured fields.
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_tally::observability::messages::pipeline::RunStarted;
//! use the_tally::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! let msg = RunStarted {
//!     parser: "car_sales",
//!     workers: 3,
//!     queue_capacity: 100,
//!     deadline: Duration::from_secs(5),
//! };
//!
//! let span = msg.span("pipeline_run");
//! let _guard = span.enter();
//! msg.log();
//! ```

pub mod aggregator;
pub mod pipeline;
pub mod source;
pub mod worker;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event
    fn log(&self);

    /// Open a span carrying the message's fields
    fn span(&self, name: &str) -> Span;
}
