// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::RunContext;
use crate::errors::RecordError;
use crate::model::RawRecord;
use crate::observability::messages::{worker::RecordDropped, StructuredLog};

/// Reject a record whose field count differs from `expected`.
pub fn check_width(record: &RawRecord, expected: usize) -> Result<(), RecordError> {
    if record.width() == expected {
        Ok(())
    } else {
        Err(RecordError::WrongWidth {
            expected,
            actual: record.width(),
            record: record.fields().to_vec(),
        })
    }
}

/// Iterator adapter that only lets through records of the schema width.
///
/// Dropped records are logged with their content and both widths. The
/// adapter never fails; it ends when its input ends or the run is cancelled.
pub struct Validator<I> {
    inner: I,
    expected_width: usize,
    ctx: RunContext,
}

impl<I> Validator<I>
where
    I: Iterator<Item = RawRecord>,
{
    pub fn new(inner: I, expected_width: usize, ctx: RunContext) -> Self {
        Self {
            inner,
            expected_width,
            ctx,
        }
    }
}

impl<I> Iterator for Validator<I>
where
    I: Iterator<Item = RawRecord>,
{
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        loop {
            if self.ctx.is_cancelled() {
                return None;
            }
            let record = self.inner.next()?;
            match check_width(&record, self.expected_width) {
                Ok(()) => return Some(record),
                Err(error) => {
                    RecordDropped {
                        stage: "validator",
                        line: record.line(),
                        error: &error,
                    }
                    .log();
                    self.ctx.counters().dropped_width();
                }
            }
        }
    }
}
