// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline orchestrator.
//!
//! Wires `source -> validator -> worker pool -> aggregator` through two
//! bounded queues and races aggregator completion against the deadline.
//!
//! ```text
//! Idle ──► Running ──► Completed
//!   │                └► TimedOut
//!   └► Aborted   (input or config unusable; no result)
//! ```
//!
//! Once `Running`, every per-record or per-stage problem is absorbed by the
//! stage that hit it, so the only way out is one of the two terminal states.
//! On `TimedOut` the token is tripped, the aggregator finishes the merge it
//! is in the middle of and stops, and its state becomes the snapshot.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use the_tally::config::PipelineConfig;
//! use the_tally::engine::{Pipeline, RunStatus};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let csv = "\
//! Manufacturer,Model,Sales,Resale,Type,Price,Engine,HP,Wheelbase,Width,Length,Weight,Fuel,MPG,Launch
//! Acura,Integra,16.919,16.36,Passenger,21.5,1.8,140,101.2,67.3,172.4,2.639,13.2,28,2-Feb-12
//! Acura,TL,39.384,19.875,Passenger,28.4,3.2,225,108.1,70.3,192.9,3.517,17.2,25,6-Mar-11
//! ";
//!
//! let pipeline = Pipeline::car_sales(PipelineConfig::default())?;
//! let result = pipeline.run(Cursor::new(csv.as_bytes().to_vec())).await?;
//!
//! assert_eq!(result.status, RunStatus::Completed);
//! assert_eq!(result.snapshot.count("Acura"), 2);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::Instrument;

use crate::config::PipelineConfig;
use crate::engine::aggregator::{Aggregator, AggregatorExit};
use crate::engine::context::{CounterSnapshot, RunContext};
use crate::engine::stats::StatsSnapshot;
use crate::engine::worker_pool::{WorkerPool, WorkerReport};
use crate::errors::{ConfigError, PipelineError};
use crate::model::CarSaleParser;
use crate::observability::messages::pipeline::{
    DeadlineExpired, PhaseTransition, RunFinished, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::source::{spawn_upstream, RecordSource, Validator};
use crate::traits::{Aggregatable, RecordParser};

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Running,
    Completed,
    TimedOut,
    Aborted,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Idle => "Idle",
            PipelinePhase::Running => "Running",
            PipelinePhase::Completed => "Completed",
            PipelinePhase::TimedOut => "TimedOut",
            PipelinePhase::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}

/// Terminal status of a run that reached `Running`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Completed,
    TimedOut,
}

impl From<RunStatus> for PipelinePhase {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => PipelinePhase::Completed,
            RunStatus::TimedOut => PipelinePhase::TimedOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub header: Vec<String>,
    pub counters: CounterSnapshot,
    pub workers: Vec<WorkerReport>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub status: RunStatus,
    pub snapshot: StatsSnapshot,
    pub report: RunReport,
}

pub struct Pipeline<P: RecordParser> {
    config: PipelineConfig,
    parser: Arc<P>,
}

impl Pipeline<CarSaleParser> {
    /// Pipeline over the reference car sales schema.
    pub fn car_sales(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::new(config, CarSaleParser::new())
    }
}

impl<P> Pipeline<P>
where
    P: RecordParser,
    P::Entity: Aggregatable,
{
    /// Validate `config` against the parser's schema width.
    pub fn new(config: PipelineConfig, parser: P) -> Result<Self, PipelineError> {
        if let Err(errors) = config.validate(parser.schema_width()) {
            log_transition(PipelinePhase::Idle, PipelinePhase::Aborted);
            return Err(ConfigError::Invalid(errors).into());
        }
        Ok(Self {
            config,
            parser: Arc::new(parser),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline over `input` until it is exhausted or the deadline passes.
    ///
    /// Returns `Err` only if the header cannot be read (before `Running`) or
    /// if a stage task panics.
    pub async fn run<R>(&self, input: R) -> Result<PipelineResult, PipelineError>
    where
        R: Read + Send + 'static,
    {
        let started = RunStarted {
            parser: self.parser.name(),
            workers: self.config.workers,
            queue_capacity: self.config.queue_capacity,
            deadline: self.config.deadline(),
        };
        let span = started.span("pipeline_run");
        started.log();
        self.execute(input).instrument(span).await
    }

    async fn execute<R>(&self, input: R) -> Result<PipelineResult, PipelineError>
    where
        R: Read + Send + 'static,
    {
        let clock = Instant::now();
        let ctx = RunContext::new(self.config.deadline());
        let width = self.parser.schema_width();

        let delimiter = self.config.delimiter_byte();
        let source_ctx = ctx.clone();
        let opened = tokio::task::spawn_blocking(move || {
            RecordSource::open(input, delimiter, width, source_ctx)
        })
        .await
        .map_err(|e| join_failure("source", e))
        .and_then(|opened| opened);
        let source = match opened {
            Ok(source) => source,
            Err(error) => {
                log_transition(PipelinePhase::Idle, PipelinePhase::Aborted);
                return Err(error);
            }
        };
        let header = source.header().to_vec();

        log_transition(PipelinePhase::Idle, PipelinePhase::Running);

        let capacity = self.config.queue_capacity.max(1);
        let (raw_tx, raw_rx) = mpsc::channel(capacity);
        let (entity_tx, entity_rx) = mpsc::channel::<P::Entity>(capacity);

        let validated = Validator::new(source, width, ctx.clone());
        let upstream = spawn_upstream(validated, raw_tx, ctx.clone());
        let pool = WorkerPool::new(Arc::clone(&self.parser), self.config.workers)
            .spawn(raw_rx, entity_tx, ctx.clone());
        let aggregator = Aggregator::new(self.config.bucket_width);
        let stats = aggregator.handle();
        let mut aggregation = aggregator.spawn(entity_rx, ctx.clone());

        let exit = tokio::select! {
            joined = &mut aggregation => joined.map_err(|e| join_failure("aggregator", e))?,
            _ = ctx.cancelled() => {
                ctx.cancel();
                (&mut aggregation).await.map_err(|e| join_failure("aggregator", e))?
            }
        };

        let status = match exit {
            AggregatorExit::InputExhausted => RunStatus::Completed,
            AggregatorExit::Cancelled => RunStatus::TimedOut,
        };
        let snapshot = stats.snapshot().await;

        if status == RunStatus::TimedOut {
            DeadlineExpired {
                deadline: ctx.budget(),
                merged: snapshot.total_count,
            }
            .log();
        }

        let workers = pool.await.map_err(|e| join_failure("worker_pool", e))?;
        match status {
            RunStatus::Completed => {
                upstream.await.map_err(|e| join_failure("upstream", e))?;
            }
            // A cancelled upstream may still be parked inside a slow read;
            // it exits on its own at the next record boundary.
            RunStatus::TimedOut => drop(upstream),
        }

        let counters = ctx.counters().snapshot();
        let elapsed = clock.elapsed();
        log_transition(PipelinePhase::Running, status.into());
        RunFinished {
            status: status_name(status),
            records_read: counters.records_read,
            merged: counters.merged,
            dropped: counters.dropped(),
            duration: elapsed,
        }
        .log();

        Ok(PipelineResult {
            status,
            snapshot,
            report: RunReport {
                header,
                counters,
                workers,
                elapsed_ms: duration_ms(elapsed),
            },
        })
    }
}

fn status_name(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Completed => "Completed",
        RunStatus::TimedOut => "TimedOut",
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn log_transition(from: PipelinePhase, to: PipelinePhase) {
    let (from, to) = (from.to_string(), to.to_string());
    PhaseTransition {
        from: &from,
        to: &to,
    }
    .log();
}

fn join_failure(stage: &'static str, error: JoinError) -> PipelineError {
    PipelineError::StageJoin {
        stage,
        reason: error.to_string(),
    }
}
