// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Every diagnostic event emitted by the pipeline is a struct in
//! [`messages`] implementing `Display` plus [`messages::StructuredLog`], so the
//! hot path never formats ad hoc strings and every event carries the same
//! structured fields wherever it is logged.
//!
//! Messages are organized by stage:
//! * `messages::source` - header handling, read errors, upstream completion
//! * `messages::worker` - worker lifecycle and dropped records
//! * `messages::aggregator` - merges and aggregator exit
//! * `messages::pipeline` - run lifecycle and phase transitions
//!
//! # Usage
//!
//! ```rust
//! use the_tally::observability::messages::{worker::WorkerStarted, StructuredLog};
//!
//! let msg = WorkerStarted { worker_id: 0, parser: "car_sales" };
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber honouring `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"info"`). Safe to call more than once.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
