// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run-scoped context shared by every stage of one pipeline run.
//!
//! A [`RunContext`] bundles the cancellation token, the absolute deadline and
//! the run counters. It is created when a run starts, cloned into each stage
//! at construction and dropped with the run; nothing in it outlives the run.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct RunContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    token: CancellationToken,
    deadline: Instant,
    budget: Duration,
    counters: RunCounters,
}

impl RunContext {
    /// Start the deadline clock now.
    pub fn new(budget: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: CancellationToken::new(),
                deadline: Instant::now() + budget,
                budget,
                counters: RunCounters::default(),
            }),
        }
    }

    pub fn budget(&self) -> Duration {
        self.inner.budget
    }

    pub fn deadline(&self) -> Instant {
        self.inner.deadline
    }

    pub fn counters(&self) -> &RunCounters {
        &self.inner.counters
    }

    /// Trip the token. Idempotent; a tripped token never resets.
    pub fn cancel(&self) {
        self.inner.token.cancel();
    }

    /// Non-blocking check, usable from blocking threads.
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled() || Instant::now() >= self.inner.deadline
    }

    /// Resolves once the token is tripped or the deadline passes, whichever is
    /// first. Deadline expiry trips the token so later checks agree.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            self.inner.token.cancel();
            return;
        }
        tokio::select! {
            _ = self.inner.token.cancelled() => {}
            _ = tokio::time::sleep_until(self.inner.deadline) => self.inner.token.cancel(),
        }
    }
}

/// Side-channel counters. They are informational only and never gate processing.
#[derive(Debug, Default)]
pub struct RunCounters {
    records_read: AtomicU64,
    read_errors: AtomicU64,
    dropped_width: AtomicU64,
    dropped_parse: AtomicU64,
    merged: AtomicU64,
}

impl RunCounters {
    pub fn record_read(&self) {
        self.records_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_width(&self) {
        self.dropped_width.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_parse(&self) {
        self.dropped_parse.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the merge count including this one.
    pub fn merged(&self) -> u64 {
        self.merged.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            records_read: self.records_read.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            dropped_width: self.dropped_width.load(Ordering::Relaxed),
            dropped_parse: self.dropped_parse.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CounterSnapshot {
    pub records_read: u64,
    pub read_errors: u64,
    pub dropped_width: u64,
    pub dropped_parse: u64,
    pub merged: u64,
}

impl CounterSnapshot {
    pub fn dropped(&self) -> u64 {
        self.dropped_width + self.dropped_parse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_cancel_is_observed() {
        let ctx = RunContext::new(Duration::from_secs(60));
        assert!(!ctx.is_cancelled());
        ctx.cancel();
        assert!(ctx.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), ctx.cancelled())
            .await
            .expect("cancelled() should resolve immediately");
    }

    #[tokio::test]
    async fn deadline_trips_token() {
        let ctx = RunContext::new(Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(2), ctx.cancelled())
            .await
            .expect("deadline should trip");
        assert!(ctx.is_cancelled());
        assert!(ctx.inner.token.is_cancelled());
    }

    #[tokio::test]
    async fn clones_share_one_token() {
        let ctx = RunContext::new(Duration::from_secs(60));
        let stage = ctx.clone();
        ctx.cancel();
        assert!(stage.is_cancelled());
    }

    #[test]
    fn counters_accumulate() {
        let counters = RunCounters::default();
        counters.record_read();
        counters.record_read();
        counters.dropped_width();
        assert_eq!(counters.merged(), 1);
        let snapshot = counters.snapshot();
        assert_eq!(snapshot.records_read, 2);
        assert_eq!(snapshot.dropped(), 1);
        assert_eq!(snapshot.merged, 1);
    }
}
