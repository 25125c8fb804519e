// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shows a run that hits its deadline and still returns partial statistics.
//!
//! ```text
//! cargo run --example deadline_demo
//! RUST_LOG=debug cargo run --example deadline_demo
//! ```

use async_trait::async_trait;
use std::io::Cursor;
use std::time::Duration;
use the_tally::config::PipelineConfig;
use the_tally::engine::{Pipeline, RunStatus};
use the_tally::errors::RecordError;
use the_tally::model::{CarSale, CarSaleParser, RawRecord};
use the_tally::observability::init_tracing;
use the_tally::traits::RecordParser;

/// Car sales parser that pretends each record costs a network round trip.
struct ThrottledParser {
    latency: Duration,
}

#[async_trait]
impl RecordParser for ThrottledParser {
    type Entity = CarSale;

    async fn parse(&self, record: &RawRecord) -> Result<CarSale, RecordError> {
        tokio::time::sleep(self.latency).await;
        CarSaleParser.parse(record).await
    }

    fn schema_width(&self) -> usize {
        CarSaleParser.schema_width()
    }

    fn name(&self) -> &'static str {
        "throttled_car_sales"
    }
}

fn generate_csv(rows: usize) -> String {
    let makers = ["Acura", "Audi", "BMW", "Buick", "Ford", "Honda"];
    let mut csv = String::from(
        "Manufacturer,Model,Sales_in_thousands,__year_resale_value,Vehicle_type,Price_in_thousands,\
         Engine_size,Horsepower,Wheelbase,Width,Length,Curb_weight,Fuel_capacity,Fuel_efficiency,Latest_Launch\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "{},Model{},{:.3},.,Passenger,{:.1},2.4,{},104.0,70.1,185.0,3.2,16.0,26,14-Mar-12\n",
            makers[i % makers.len()],
            i,
            5.0 + (i % 13) as f64 * 1.5,
            15.0 + (i % 40) as f64,
            120 + (i % 9) * 15
        ));
    }
    csv
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = PipelineConfig::default()
        .with_workers(3)
        .with_deadline(Duration::from_millis(500));
    let pipeline = Pipeline::new(
        config,
        ThrottledParser {
            latency: Duration::from_millis(20),
        },
    )?;

    println!("⏳ Tallying 1000 records at ~20ms each with a 500ms deadline");
    let result = pipeline
        .run(Cursor::new(generate_csv(1000).into_bytes()))
        .await?;

    match result.status {
        RunStatus::Completed => println!("✅ Finished before the deadline"),
        RunStatus::TimedOut => println!(
            "⏰ Deadline hit: {} of {} read records merged",
            result.snapshot.total_count, result.report.counters.records_read
        ),
    }

    for (maker, totals) in &result.snapshot.by_category {
        println!("  {:<8} {:>8.3} ({} models)", maker, totals.sum, totals.count);
    }
    for worker in &result.report.workers {
        println!("  worker {} parsed {}", worker.worker_id, worker.parsed);
    }
    Ok(())
}
