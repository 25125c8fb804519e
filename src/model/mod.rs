// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Record and entity types flowing through the pipeline.
//!
//! * [`RawRecord`] - ordered string fields from one input line
//! * [`schema`] - declared column names and kinds
//! * [`fields`] - per-field trimming, missing-value defaulting and coercion
//! * [`CarSale`] - the typed entity for the car sales schema

mod car;
mod record;

pub mod fields;
pub mod schema;

pub use car::{CarSale, CarSaleParser};
pub use record::RawRecord;
