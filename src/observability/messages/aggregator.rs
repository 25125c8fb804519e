// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the aggregator stage.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A single entity was folded into the aggregate state.
///
/// # Log Level
/// `trace!` - emitted once per entity
pub struct EntityMerged<'a> {
    pub category: &'a str,
    pub measure: f64,
    pub merged: u64,
}

impl Display for EntityMerged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Merged entity #{} into '{}' (+{})",
            self.merged, self.category, self.measure
        )
    }
}

impl StructuredLog for EntityMerged<'_> {
    fn log(&self) {
        tracing::trace!(
            category = self.category,
            measure = self.measure,
            merged = self.merged,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("entity_merged", span_name = name, category = self.category)
    }
}

/// Aggregator stopped consuming.
///
/// # Log Level
/// `info!` - stage lifecycle
///
/// # Example
/// ```
/// use the_tally::observability::messages::aggregator::AggregatorFinished;
///
/// let msg = AggregatorFinished { merged: 40, reason: "input exhausted" };
/// assert_eq!(msg.to_string(), "Aggregator finished (input exhausted): 40 entities merged");
/// ```
pub struct AggregatorFinished<'a> {
    pub merged: u64,
    pub reason: &'a str,
}

impl Display for AggregatorFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Aggregator finished ({}): {} entities merged",
            self.reason, self.merged
        )
    }
}

impl StructuredLog for AggregatorFinished<'_> {
    fn log(&self) {
        tracing::info!(merged = self.merged, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "aggregator_finished",
            span_name = name,
            merged = self.merged,
            reason = self.reason,
        )
    }
}
