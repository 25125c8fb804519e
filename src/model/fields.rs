// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Field coercion rules.
//!
//! Every field is trimmed first. A field whose trimmed value is exactly
//! [`MISSING_SENTINEL`] yields the kind's zero value without attempting a
//! parse. Anything else must parse cleanly as the declared kind; the first
//! failure is reported as [`RecordError::InvalidField`] carrying the whole
//! record, and the caller drops the record.

use chrono::NaiveDate;

use crate::config::consts::MISSING_SENTINEL;
use crate::errors::RecordError;
use crate::model::schema::{FieldKind, FieldSpec};
use crate::model::RawRecord;

pub const DATE_FORMAT: &str = "%d-%b-%y";

/// Largest accepted decimal magnitude. Keeps every measure well inside the
/// aggregator's fixed-point range.
pub const MAX_DECIMAL_MAGNITUDE: f64 = 1e12;

fn is_missing(value: &str) -> bool {
    value == MISSING_SENTINEL
}

pub fn parse_text(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if is_missing(value) {
        return Ok(String::new());
    }
    Ok(value.to_string())
}

pub fn parse_decimal(raw: &str) -> Result<f64, String> {
    let value = raw.trim();
    if is_missing(value) {
        return Ok(0.0);
    }
    let parsed: f64 = value.parse().map_err(|e| format!("not a decimal: {}", e))?;
    if !parsed.is_finite() {
        return Err("decimal must be finite".to_string());
    }
    if parsed.abs() > MAX_DECIMAL_MAGNITUDE {
        return Err(format!("decimal magnitude exceeds {:e}", MAX_DECIMAL_MAGNITUDE));
    }
    Ok(parsed)
}

pub fn parse_integer(raw: &str) -> Result<i64, String> {
    let value = raw.trim();
    if is_missing(value) {
        return Ok(0);
    }
    value.parse().map_err(|e| format!("not an integer: {}", e))
}

pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let value = raw.trim();
    if is_missing(value) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|e| format!("expected {}: {}", DATE_FORMAT, e))
}

/// Typed, schema-checked access to the fields of one record.
pub struct FieldReader<'a> {
    record: &'a RawRecord,
    schema: &'a [FieldSpec],
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a RawRecord, schema: &'a [FieldSpec]) -> Self {
        Self { record, schema }
    }

    pub fn text(&self, index: usize) -> Result<String, RecordError> {
        self.read(index, FieldKind::Text, parse_text)
    }

    pub fn decimal(&self, index: usize) -> Result<f64, RecordError> {
        self.read(index, FieldKind::Decimal, parse_decimal)
    }

    pub fn integer(&self, index: usize) -> Result<i64, RecordError> {
        self.read(index, FieldKind::Integer, parse_integer)
    }

    pub fn date(&self, index: usize) -> Result<Option<NaiveDate>, RecordError> {
        self.read(index, FieldKind::Date, parse_date)
    }

    fn read<T>(
        &self,
        index: usize,
        kind: FieldKind,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, RecordError> {
        let spec = self.schema.get(index);
        let name = spec.map(|s| s.name).unwrap_or("<unknown>");
        debug_assert_eq!(spec.map(|s| s.kind), Some(kind), "schema kind mismatch for '{}'", name);

        let raw = self.record.get(index).ok_or_else(|| self.invalid(name, "", "column absent".to_string()))?;
        parse(raw).map_err(|reason| self.invalid(name, raw, reason))
    }

    fn invalid(&self, field: &'static str, value: &str, reason: String) -> RecordError {
        RecordError::InvalidField {
            field,
            value: value.to_string(),
            reason,
            record: self.record.fields().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::CAR_SALES_SCHEMA;

    #[test]
    fn missing_sentinel_yields_zero_for_every_kind() {
        assert_eq!(parse_text("."), Ok(String::new()));
        assert_eq!(parse_decimal("."), Ok(0.0));
        assert_eq!(parse_integer("."), Ok(0));
        assert_eq!(parse_date("."), Ok(None));
    }

    #[test]
    fn sentinel_is_recognised_after_trimming() {
        assert_eq!(parse_decimal("  .  "), Ok(0.0));
        assert_eq!(parse_integer("\t."), Ok(0));
    }

    #[test]
    fn sentinel_must_be_exact() {
        assert!(parse_decimal("..").is_err());
        assert!(parse_integer(". 5").is_err());
    }

    #[test]
    fn values_are_trimmed_before_parsing() {
        assert_eq!(parse_text("  Acura "), Ok("Acura".to_string()));
        assert_eq!(parse_decimal(" 21.5 "), Ok(21.5));
        assert_eq!(parse_integer(" 140 "), Ok(140));
    }

    #[test]
    fn non_finite_decimals_rejected() {
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("inf").is_err());
    }

    #[test]
    fn out_of_range_decimals_rejected() {
        assert_eq!(parse_decimal("1e12"), Ok(1e12));
        assert_eq!(parse_decimal("-1e12"), Ok(-1e12));
        assert!(parse_decimal("1e13").is_err());
        assert!(parse_decimal("-1e19").is_err());
    }

    #[test]
    fn integer_rejects_fractional_values() {
        assert!(parse_integer("140.5").is_err());
    }

    #[test]
    fn date_uses_day_month_abbrev_two_digit_year() {
        assert_eq!(parse_date("18-Jan-12"), Ok(NaiveDate::from_ymd_opt(2012, 1, 18)));
        assert_eq!(parse_date("2-Feb-12"), Ok(NaiveDate::from_ymd_opt(2012, 2, 2)));
        assert!(parse_date("2012-01-18").is_err());
    }

    #[test]
    fn reader_reports_field_name_and_record() {
        let record = RawRecord::from(vec![
            "Acme", "Sedan", "25.0-priced", ".", "Passenger", "21.5", "1.8", "140", "101.2",
            "67.3", "172.4", "2.639", "13.2", "28", "2-Feb-12",
        ]);
        let reader = FieldReader::new(&record, &CAR_SALES_SCHEMA);
        match reader.decimal(2).unwrap_err() {
            RecordError::InvalidField { field, value, record, .. } => {
                assert_eq!(field, "sales_in_thousands");
                assert_eq!(value, "25.0-priced");
                assert_eq!(record.len(), 15);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }
}
