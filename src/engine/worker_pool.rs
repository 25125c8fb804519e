// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fixed-size pool of parser workers between the two bounded queues.
//!
//! ```text
//!                 ┌─ worker 0 ─┐
//! raw records ──► ├─ worker 1 ─┤ ──► entities
//!   (shared rx)   └─ worker N ─┘   (cloned tx)
//! ```
//!
//! Workers share the input receiver behind a mutex and each own a clone of
//! the output sender; there is no other state between them. The output
//! queue closes when the last clone drops, which is only after every worker
//! has drained its input and returned, and the supervisor task joins all of
//! them before reporting. Downstream never sees a half-finished pool.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tracing::Instrument;

use crate::engine::RunContext;
use crate::model::RawRecord;
use crate::observability::messages::worker::{
    PoolDrained, RecordDropped, WorkerFinished, WorkerStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::RecordParser;

/// Per-worker tallies, returned once the worker exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub parsed: u64,
    pub dropped: u64,
}

pub struct WorkerPool<P: RecordParser> {
    parser: Arc<P>,
    workers: usize,
}

type SharedInput = Arc<Mutex<mpsc::Receiver<RawRecord>>>;

impl<P: RecordParser> WorkerPool<P> {
    /// A pool of at least one worker.
    pub fn new(parser: Arc<P>, workers: usize) -> Self {
        Self {
            parser,
            workers: workers.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.workers
    }

    /// Start every worker and a supervisor that joins them.
    ///
    /// The supervisor resolves to the worker reports, ordered by worker id,
    /// once all workers have exited. A panicking worker is reported and the
    /// rest still join.
    pub fn spawn(
        self,
        input: mpsc::Receiver<RawRecord>,
        output: mpsc::Sender<P::Entity>,
        ctx: RunContext,
    ) -> JoinHandle<Vec<WorkerReport>> {
        let input: SharedInput = Arc::new(Mutex::new(input));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.workers {
            let span = WorkerStarted {
                worker_id,
                parser: self.parser.name(),
            }
            .span("parser_worker");

            workers.spawn(
                run_worker(
                    worker_id,
                    Arc::clone(&self.parser),
                    Arc::clone(&input),
                    output.clone(),
                    ctx.clone(),
                )
                .instrument(span),
            );
        }
        drop(output);
        drop(input);

        let size = self.workers;
        tokio::spawn(async move {
            let mut reports = Vec::with_capacity(size);
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(report) => reports.push(report),
                    Err(e) => tracing::error!(error = %e, "parser worker did not finish cleanly"),
                }
            }
            reports.sort_by_key(|r| r.worker_id);

            PoolDrained {
                workers: size,
                parsed: reports.iter().map(|r| r.parsed).sum(),
                dropped: reports.iter().map(|r| r.dropped).sum(),
            }
            .log();
            reports
        })
    }
}

async fn next_record(input: &SharedInput) -> Option<RawRecord> {
    input.lock().await.recv().await
}

async fn run_worker<P: RecordParser>(
    worker_id: usize,
    parser: Arc<P>,
    input: SharedInput,
    output: mpsc::Sender<P::Entity>,
    ctx: RunContext,
) -> WorkerReport {
    WorkerStarted {
        worker_id,
        parser: parser.name(),
    }
    .log();

    let mut report = WorkerReport {
        worker_id,
        ..WorkerReport::default()
    };

    let cancelled = loop {
        let next = tokio::select! {
            biased;
            _ = ctx.cancelled() => break true,
            next = next_record(&input) => next,
        };
        let Some(record) = next else {
            break false;
        };

        match parser.parse(&record).await {
            Ok(entity) => {
                let sent = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => break true,
                    sent = output.send(entity) => sent,
                };
                if sent.is_err() {
                    break ctx.is_cancelled();
                }
                report.parsed += 1;
            }
            Err(error) => {
                RecordDropped {
                    stage: "worker",
                    line: record.line(),
                    error: &error,
                }
                .log();
                ctx.counters().dropped_parse();
                report.dropped += 1;
            }
        }
    };

    WorkerFinished {
        worker_id,
        parsed: report.parsed,
        dropped: report.dropped,
        cancelled,
    }
    .log();
    report
}
