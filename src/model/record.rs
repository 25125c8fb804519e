// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Ordered list of string fields read from one input line.
///
/// `line` is the 1-based line number in the input and exists only to make
/// drop logs actionable; records carry no other identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    line: u64,
    fields: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl From<Vec<&str>> for RawRecord {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(0, fields.into_iter().map(String::from).collect())
    }
}
