// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single merge point for parsed entities.
//!
//! The [`Aggregator`] owns the run's [`AggregateState`] behind one mutex.
//! Each merge takes the lock, applies every update for the entity and
//! releases it, so a concurrent [`StatsHandle::snapshot`] sees either all of
//! an entity's updates or none of them. The consuming task checks the token
//! before every receive; an in-flight merge always completes, and nothing is
//! merged after the token trips.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::engine::stats::{AggregateState, StatsSnapshot};
use crate::engine::RunContext;
use crate::observability::messages::aggregator::{AggregatorFinished, EntityMerged};
use crate::observability::messages::StructuredLog;
use crate::traits::Aggregatable;

/// Why the aggregator stopped consuming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorExit {
    /// Every upstream sender was dropped: all workers joined
    InputExhausted,
    /// The token tripped first
    Cancelled,
}

impl AggregatorExit {
    fn as_str(&self) -> &'static str {
        match self {
            AggregatorExit::InputExhausted => "input exhausted",
            AggregatorExit::Cancelled => "cancelled",
        }
    }
}

/// Cloneable read handle onto the aggregate state
#[derive(Clone, Debug)]
pub struct StatsHandle {
    state: Arc<Mutex<AggregateState>>,
}

impl StatsHandle {
    pub async fn snapshot(&self) -> StatsSnapshot {
        self.state.lock().await.snapshot()
    }
}

#[derive(Debug)]
pub struct Aggregator {
    state: Arc<Mutex<AggregateState>>,
}

impl Aggregator {
    pub fn new(bucket_width: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(AggregateState::new(bucket_width))),
        }
    }

    pub fn handle(&self) -> StatsHandle {
        StatsHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Fold one entity under the lock.
    pub async fn merge<E: Aggregatable>(&self, entity: &E) {
        self.state.lock().await.merge(entity);
    }

    /// Consume `input` on a dedicated task until it closes or the run is
    /// cancelled. The state stays reachable through any [`StatsHandle`].
    pub fn spawn<E>(self, mut input: mpsc::Receiver<E>, ctx: RunContext) -> JoinHandle<AggregatorExit>
    where
        E: Aggregatable + 'static,
    {
        tokio::spawn(async move {
            let exit = loop {
                let next = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => break AggregatorExit::Cancelled,
                    next = input.recv() => next,
                };

                let Some(entity) = next else {
                    break AggregatorExit::InputExhausted;
                };

                self.merge(&entity).await;
                let merged = ctx.counters().merged();
                EntityMerged {
                    category: entity.category(),
                    measure: entity.primary_measure(),
                    merged,
                }
                .log();
            };

            AggregatorFinished {
                merged: ctx.counters().snapshot().merged,
                reason: exit.as_str(),
            }
            .log();
            exit
        })
    }
}
