// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod aggregator;
mod context;
mod pipeline;
mod stats;
mod worker_pool;

#[cfg(test)]
mod integration_tests;

pub use aggregator::{Aggregator, AggregatorExit, StatsHandle};
pub use context::{CounterSnapshot, RunContext, RunCounters};
pub use pipeline::{Pipeline, PipelinePhase, PipelineResult, RunReport, RunStatus};
pub use stats::{
    AggregateState, BucketSnapshot, CategorySnapshot, StatsSnapshot, SubcategorySnapshot,
};
pub use worker_pool::{WorkerPool, WorkerReport};
