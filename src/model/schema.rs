// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declared column layout of the car sales input.

use crate::config::consts::REFERENCE_SCHEMA_WIDTH;

/// How a column's text is coerced into a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
    /// `day-abbreviatedMonth-2digitYear`, e.g. `18-Jan-12`
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

pub const MANUFACTURER: usize = 0;
pub const MODEL: usize = 1;
pub const SALES_IN_THOUSANDS: usize = 2;
pub const FOUR_YEAR_RESALE_VALUE: usize = 3;
pub const VEHICLE_TYPE: usize = 4;
pub const PRICE_IN_THOUSANDS: usize = 5;
pub const ENGINE_SIZE: usize = 6;
pub const HORSEPOWER: usize = 7;
pub const WHEELBASE: usize = 8;
pub const WIDTH: usize = 9;
pub const LENGTH: usize = 10;
pub const CURB_WEIGHT: usize = 11;
pub const FUEL_CAPACITY: usize = 12;
pub const FUEL_EFFICIENCY: usize = 13;
pub const LATEST_LAUNCH: usize = 14;

pub const CAR_SALES_SCHEMA: [FieldSpec; REFERENCE_SCHEMA_WIDTH] = [
    field("manufacturer", FieldKind::Text),
    field("model", FieldKind::Text),
    field("sales_in_thousands", FieldKind::Decimal),
    field("four_year_resale_value", FieldKind::Decimal),
    field("vehicle_type", FieldKind::Text),
    field("price_in_thousands", FieldKind::Decimal),
    field("engine_size", FieldKind::Decimal),
    field("horsepower", FieldKind::Integer),
    field("wheelbase", FieldKind::Decimal),
    field("width", FieldKind::Decimal),
    field("length", FieldKind::Decimal),
    field("curb_weight", FieldKind::Decimal),
    field("fuel_capacity", FieldKind::Decimal),
    field("fuel_efficiency", FieldKind::Integer),
    field("latest_launch", FieldKind::Date),
];
