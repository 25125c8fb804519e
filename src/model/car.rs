// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::RecordError;
use crate::model::fields::FieldReader;
use crate::model::schema::*;
use crate::model::RawRecord;
use crate::traits::{Aggregatable, RecordParser};

/// One row of the car sales dataset.
///
/// Created once per successfully parsed record and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarSale {
    pub manufacturer: String,
    pub model: String,
    pub sales_in_thousands: f64,
    pub four_year_resale_value: f64,
    pub vehicle_type: String,
    pub price_in_thousands: f64,
    pub engine_size: f64,
    pub horsepower: i64,
    pub wheelbase: f64,
    pub width: f64,
    pub length: f64,
    pub curb_weight: f64,
    pub fuel_capacity: f64,
    pub fuel_efficiency: i64,
    pub latest_launch: Option<NaiveDate>,
}

impl CarSale {
    /// Parse every column of `record`; the first bad field rejects the whole record.
    ///
    /// Width is checked upstream, but a short record is still reported as
    /// `WrongWidth` rather than indexing past the end.
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        if record.width() != CAR_SALES_SCHEMA.len() {
            return Err(RecordError::WrongWidth {
                expected: CAR_SALES_SCHEMA.len(),
                actual: record.width(),
                record: record.fields().to_vec(),
            });
        }

        let fields = FieldReader::new(record, &CAR_SALES_SCHEMA);
        Ok(Self {
            manufacturer: fields.text(MANUFACTURER)?,
            model: fields.text(MODEL)?,
            sales_in_thousands: fields.decimal(SALES_IN_THOUSANDS)?,
            four_year_resale_value: fields.decimal(FOUR_YEAR_RESALE_VALUE)?,
            vehicle_type: fields.text(VEHICLE_TYPE)?,
            price_in_thousands: fields.decimal(PRICE_IN_THOUSANDS)?,
            engine_size: fields.decimal(ENGINE_SIZE)?,
            horsepower: fields.integer(HORSEPOWER)?,
            wheelbase: fields.decimal(WHEELBASE)?,
            width: fields.decimal(WIDTH)?,
            length: fields.decimal(LENGTH)?,
            curb_weight: fields.decimal(CURB_WEIGHT)?,
            fuel_capacity: fields.decimal(FUEL_CAPACITY)?,
            fuel_efficiency: fields.integer(FUEL_EFFICIENCY)?,
            latest_launch: fields.date(LATEST_LAUNCH)?,
        })
    }
}

impl Aggregatable for CarSale {
    fn category(&self) -> &str {
        &self.manufacturer
    }

    fn subcategory(&self) -> Option<&str> {
        Some(&self.vehicle_type)
    }

    fn primary_measure(&self) -> f64 {
        self.sales_in_thousands
    }

    fn secondary_measure(&self) -> Option<i64> {
        Some(self.horsepower)
    }

    fn bucket_measure(&self) -> f64 {
        self.price_in_thousands
    }
}

/// Stateless parser for the car sales schema
#[derive(Debug, Default, Clone, Copy)]
pub struct CarSaleParser;

impl CarSaleParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordParser for CarSaleParser {
    type Entity = CarSale;

    async fn parse(&self, record: &RawRecord) -> Result<CarSale, RecordError> {
        CarSale::from_record(record)
    }

    fn schema_width(&self) -> usize {
        CAR_SALES_SCHEMA.len()
    }

    fn name(&self) -> &'static str {
        "car_sales"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: [&str; 15]) -> RawRecord {
        RawRecord::from(fields.to_vec())
    }

    const ACURA_INTEGRA: [&str; 15] = [
        "Acura", "Integra", "16.919", "16.36", "Passenger", "21.5", "1.8", "140", "101.2",
        "67.3", "172.4", "2.639", "13.2", "28", "2-Feb-12",
    ];

    #[test]
    fn parses_reference_row() {
        let car = CarSale::from_record(&row(ACURA_INTEGRA)).unwrap();
        assert_eq!(car.manufacturer, "Acura");
        assert_eq!(car.model, "Integra");
        assert_eq!(car.sales_in_thousands, 16.919);
        assert_eq!(car.vehicle_type, "Passenger");
        assert_eq!(car.price_in_thousands, 21.5);
        assert_eq!(car.horsepower, 140);
        assert_eq!(car.fuel_efficiency, 28);
        assert_eq!(car.latest_launch, NaiveDate::from_ymd_opt(2012, 2, 2));
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let mut fields = ACURA_INTEGRA;
        for index in [
            SALES_IN_THOUSANDS,
            FOUR_YEAR_RESALE_VALUE,
            PRICE_IN_THOUSANDS,
            ENGINE_SIZE,
            HORSEPOWER,
            WHEELBASE,
            WIDTH,
            LENGTH,
            CURB_WEIGHT,
            FUEL_CAPACITY,
            FUEL_EFFICIENCY,
        ] {
            fields[index] = ".";
        }

        let car = CarSale::from_record(&row(fields)).unwrap();
        assert_eq!(car.sales_in_thousands, 0.0);
        assert_eq!(car.four_year_resale_value, 0.0);
        assert_eq!(car.price_in_thousands, 0.0);
        assert_eq!(car.engine_size, 0.0);
        assert_eq!(car.horsepower, 0);
        assert_eq!(car.wheelbase, 0.0);
        assert_eq!(car.width, 0.0);
        assert_eq!(car.length, 0.0);
        assert_eq!(car.curb_weight, 0.0);
        assert_eq!(car.fuel_capacity, 0.0);
        assert_eq!(car.fuel_efficiency, 0);
    }

    #[test]
    fn bad_date_drops_record() {
        let mut fields = ACURA_INTEGRA;
        fields[LATEST_LAUNCH] = "Feb 2 2012";
        let err = CarSale::from_record(&row(fields)).unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { field: "latest_launch", .. }));
    }

    #[test]
    fn short_record_reports_width() {
        let record = RawRecord::from(vec!["Acura", "Integra"]);
        let err = CarSale::from_record(&record).unwrap_err();
        assert!(matches!(err, RecordError::WrongWidth { expected: 15, actual: 2, .. }));
    }

    #[tokio::test]
    async fn parser_projects_aggregation_keys() {
        let car = CarSaleParser::new().parse(&row(ACURA_INTEGRA)).await.unwrap();
        assert_eq!(car.category(), "Acura");
        assert_eq!(car.subcategory(), Some("Passenger"));
        assert_eq!(car.primary_measure(), 16.919);
        assert_eq!(car.secondary_measure(), Some(140));
        assert_eq!(car.bucket_measure(), 21.5);
    }
}
