// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::engine::RunContext;
use crate::errors::PipelineError;
use crate::model::RawRecord;
use crate::observability::messages::source::{HeaderSkipped, LineSkipped, StreamBroken};
use crate::observability::messages::StructuredLog;

/// Open `path` for reading, mapping failure to [`PipelineError::SourceUnavailable`].
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<File, PipelineError> {
    let path = path.as_ref();
    File::open(path).map_err(|source| PipelineError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Lazy sequence of [`RawRecord`]s read from a delimited byte stream.
///
/// The header is consumed by [`RecordSource::open`], so iteration starts at
/// the first data line. Field counts are not enforced here; that is the
/// [`Validator`](crate::source::Validator)'s job. The sequence ends at
/// end of input, when the run is cancelled, or when the stream itself fails.
pub struct RecordSource<R: Read> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    ctx: RunContext,
    finished: bool,
}

impl RecordSource<File> {
    /// Open `path` and consume its header. Failure here is fatal.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
        expected_width: usize,
        ctx: RunContext,
    ) -> Result<Self, PipelineError> {
        Self::open(open_input(path)?, delimiter, expected_width, ctx)
    }
}

impl<R: Read> RecordSource<R> {
    /// Wrap `input` and consume its header line.
    ///
    /// An empty stream or an unreadable header is fatal: without a header
    /// there is no evidence the stream is the expected table at all.
    pub fn open(
        input: R,
        delimiter: u8,
        expected_width: usize,
        ctx: RunContext,
    ) -> Result<Self, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(input);

        let mut header = csv::StringRecord::new();
        if !reader.read_record(&mut header)? {
            return Err(PipelineError::MissingHeader);
        }
        let header: Vec<String> = header.iter().map(String::from).collect();

        HeaderSkipped {
            header: &header,
            expected_width,
        }
        .log();

        Ok(Self {
            reader,
            header,
            ctx,
            finished: false,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    fn finish(&mut self) -> Option<RawRecord> {
        self.finished = true;
        None
    }
}

impl<R: Read> Iterator for RecordSource<R> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        loop {
            if self.finished || self.ctx.is_cancelled() {
                return self.finish();
            }

            let mut record = csv::StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.ctx.counters().record_read();
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    return Some(RawRecord::new(line, record.iter().map(String::from).collect()));
                }
                Ok(false) => return self.finish(),
                Err(error) if matches!(error.kind(), csv::ErrorKind::Io(_)) => {
                    StreamBroken {
                        records_read: self.ctx.counters().snapshot().records_read,
                        error: &error,
                    }
                    .log();
                    self.ctx.counters().read_error();
                    return self.finish();
                }
                Err(error) => {
                    LineSkipped {
                        line: error.position().map(|p| p.line()),
                        error: &error,
                    }
                    .log();
                    self.ctx.counters().read_error();
                }
            }
        }
    }
}
