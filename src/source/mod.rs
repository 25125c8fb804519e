// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Upstream stage: read raw records, drop the wrong-width ones, and feed
//! the survivors into the first bounded queue.

mod reader;
mod validator;

pub use reader::{open_input, RecordSource};
pub use validator::{check_width, Validator};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::RunContext;
use crate::model::RawRecord;
use crate::observability::messages::{source::UpstreamFinished, StructuredLog};

/// Run `records` on a blocking thread, pushing each into `output`.
///
/// `blocking_send` parks the thread while the queue is full, which is the
/// backpressure point. The stage stops when the iterator ends, the token
/// trips, or every consumer has gone away; `output` is dropped exactly once
/// on return, closing the queue. Resolves to the number of records forwarded.
pub fn spawn_upstream<I>(
    records: I,
    output: mpsc::Sender<RawRecord>,
    ctx: RunContext,
) -> JoinHandle<u64>
where
    I: Iterator<Item = RawRecord> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut forwarded = 0;
        for record in records {
            if ctx.is_cancelled() || output.blocking_send(record).is_err() {
                break;
            }
            forwarded += 1;
        }
        drop(output);

        UpstreamFinished {
            forwarded,
            cancelled: ctx.is_cancelled(),
        }
        .log();
        forwarded
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn records(count: u64) -> impl Iterator<Item = RawRecord> + Send + 'static {
        (0..count).map(|line| RawRecord::new(line + 2, vec![line.to_string()]))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn forwards_everything_and_closes() {
        let ctx = RunContext::new(Duration::from_secs(10));
        let (tx, mut rx) = mpsc::channel(4);
        let handle = spawn_upstream(records(10), tx, ctx);

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 10);
        assert_eq!(handle.await.unwrap(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn full_queue_applies_backpressure() {
        let ctx = RunContext::new(Duration::from_secs(10));
        let (tx, mut rx) = mpsc::channel(2);
        let handle = spawn_upstream(records(50), tx, ctx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "producer should be parked on a full queue");

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 50);
        assert_eq!(handle.await.unwrap(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropping_consumer_releases_parked_producer() {
        let ctx = RunContext::new(Duration::from_secs(10));
        let (tx, rx) = mpsc::channel(1);
        let handle = spawn_upstream(records(1_000), tx, ctx.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        ctx.cancel();
        drop(rx);

        let forwarded = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("producer must exit once consumers are gone")
            .unwrap();
        assert!(forwarded < 1_000);
    }
}
