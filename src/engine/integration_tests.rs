// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end runs of the full pipeline over in-memory CSV input.

use async_trait::async_trait;
use std::io::Cursor;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::engine::{Pipeline, PipelineResult, RunStatus};
use crate::errors::RecordError;
use crate::model::{CarSale, CarSaleParser, RawRecord};
use crate::traits::RecordParser;

const HEADER: &str = "Manufacturer,Model,Sales_in_thousands,__year_resale_value,Vehicle_type,\
Price_in_thousands,Engine_size,Horsepower,Wheelbase,Width,Length,Curb_weight,Fuel_capacity,\
Fuel_efficiency,Latest_Launch";

const MAKERS: [&str; 4] = ["Acura", "Audi", "BMW", "Ford"];
const TYPES: [&str; 2] = ["Passenger", "Car"];

fn car_row(index: usize) -> String {
    let maker = MAKERS[index % MAKERS.len()];
    let kind = TYPES[index % TYPES.len()];
    let sales = 1.0 + (index as f64) * 0.125;
    let price = 10.0 + (index % 50) as f64;
    let horsepower = 100 + (index % 7) * 10;
    format!(
        "{maker},M{index},{sales},12.5,{kind},{price},2.0,{horsepower},100.0,70.0,180.0,3.0,15.0,25,2-Feb-12"
    )
}

fn csv(rows: &[String]) -> Cursor<Vec<u8>> {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    Cursor::new(text.into_bytes())
}

fn rows(count: usize) -> Vec<String> {
    (0..count).map(car_row).collect()
}

async fn run_with(config: PipelineConfig, rows: &[String]) -> PipelineResult {
    Pipeline::car_sales(config)
        .unwrap()
        .run(csv(rows))
        .await
        .unwrap()
}

/// Adds a fixed delay to every parse so a short deadline reliably fires mid-run.
struct SlowParser {
    delay: Duration,
}

#[async_trait]
impl RecordParser for SlowParser {
    type Entity = CarSale;

    async fn parse(&self, record: &RawRecord) -> Result<CarSale, RecordError> {
        tokio::time::sleep(self.delay).await;
        CarSaleParser.parse(record).await
    }

    fn schema_width(&self) -> usize {
        CarSaleParser.schema_width()
    }

    fn name(&self) -> &'static str {
        "slow_car_sales"
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn every_valid_record_is_merged_once() {
    let input = rows(500);
    let result = run_with(PipelineConfig::default(), &input).await;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.snapshot.total_count, 500);

    let per_category: u64 = result.snapshot.by_category.values().map(|c| c.count).sum();
    assert_eq!(per_category, 500);

    let per_bucket: u64 = result.snapshot.distribution.iter().map(|b| b.count).sum();
    assert_eq!(per_bucket, 500);

    let expected_sum: f64 = (0..500).map(|i| 1.0 + (i as f64) * 0.125).sum();
    assert!((result.snapshot.total_sum - expected_sum).abs() < 1e-6);
}

#[tokio::test(flavor = "multi_thread")]
async fn input_order_does_not_change_the_snapshot() {
    let forward = rows(300);
    let mut reversed = forward.clone();
    reversed.reverse();
    let mut interleaved: Vec<String> = forward.iter().step_by(2).cloned().collect();
    interleaved.extend(forward.iter().skip(1).step_by(2).cloned());

    let baseline = run_with(PipelineConfig::default(), &forward).await.snapshot;
    for permutation in [reversed, interleaved] {
        let snapshot = run_with(PipelineConfig::default(), &permutation).await.snapshot;
        assert_eq!(snapshot, baseline);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn worker_count_does_not_change_the_snapshot() {
    let input = rows(400);
    let baseline = run_with(PipelineConfig::default().with_workers(1), &input)
        .await
        .snapshot;

    for workers in 2..=4 {
        let result = run_with(PipelineConfig::default().with_workers(workers), &input).await;
        assert_eq!(result.report.workers.len(), workers);
        assert_eq!(result.snapshot, baseline, "workers={workers}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_records_are_isolated() {
    let mut input = rows(20);
    input.insert(3, "Short,row,1.0".to_string());
    input.insert(9, format!("{},extra", car_row(99)));
    input.insert(12, car_row(5).replace("2.0,1", "2.0,lots"));
    input.insert(15, car_row(6).replace("2-Feb-12", "sometime"));

    let result = run_with(PipelineConfig::default(), &input).await;
    let counters = result.report.counters;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.snapshot.total_count, 20);
    assert_eq!(counters.records_read, 24);
    assert_eq!(counters.dropped_width, 2);
    assert_eq!(counters.dropped_parse, 2);
    assert_eq!(counters.merged, 20);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_values_default_to_zero() {
    let input = vec![
        "Acme,Roadster,.,.,Passenger,.,.,.,.,.,.,.,.,.,.".to_string(),
        "Acme,Coupe,2.5,.,Passenger,15.0,.,180,.,.,.,.,.,.,.".to_string(),
    ];
    let result = run_with(PipelineConfig::default(), &input).await;
    let acme = &result.snapshot.by_category["Acme"];

    assert_eq!(result.report.counters.dropped(), 0);
    assert_eq!(acme.count, 2);
    assert_eq!(acme.sum, 2.5);
    assert_eq!(acme.secondary, vec![0, 180]);
    assert_eq!(result.snapshot.bucket("0-10"), 1);
    assert_eq!(result.snapshot.bucket("10-20"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn one_good_row_and_one_unparseable_row() {
    let input = vec![
        "Acme,Roadster,10.5,.,Passenger,27.5,2.0,150,100,70,180,3,15,25,1-Jan-20".to_string(),
        "Acme,Broken,25.0-priced,.,Passenger,27.5,2.0,150,100,70,180,3,15,25,1-Jan-20".to_string(),
    ];
    let result = run_with(PipelineConfig::default(), &input).await;
    let counters = result.report.counters;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.snapshot.sum("Acme"), Some(10.5));
    assert_eq!(result.snapshot.count("Acme"), 1);
    assert_eq!(result.snapshot.by_subcategory["Passenger"].sum, 10.5);
    assert_eq!(result.snapshot.bucket("20-30"), 1);
    assert_eq!(counters.dropped_width, 0);
    assert_eq!(counters.dropped_parse, 1);

    let worker_drops: u64 = result.report.workers.iter().map(|w| w.dropped).sum();
    assert_eq!(worker_drops, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_measures_are_dropped_not_fatal() {
    let mut input = rows(10);
    input.push("Acme,Huge,1.0,.,Passenger,1e19,2.0,150,100,70,180,3,15,25,1-Jan-20".to_string());
    input.push("Acme,Huger,1e13,.,Passenger,27.5,2.0,150,100,70,180,3,15,25,1-Jan-20".to_string());
    input.push("Acme,Fine,1.0,.,Passenger,27.5,2.0,150,100,70,180,3,15,25,1-Jan-20".to_string());

    let result = Pipeline::car_sales(PipelineConfig::default())
        .unwrap()
        .run(csv(&input))
        .await
        .expect("oversized measures must not abort the run");

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.report.counters.dropped_parse, 2);
    assert_eq!(result.snapshot.total_count, 11);
    assert_eq!(result.snapshot.sum("Acme"), Some(1.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_runs_account_for_every_record() {
    let mut input = rows(50);
    input.push("too,few".to_string());
    input.push(car_row(1).replace(",12.5,", ",n/a,"));

    let result = run_with(PipelineConfig::default(), &input).await;
    let counters = result.report.counters;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(counters.dropped_width, 1);
    assert_eq!(counters.dropped_parse, 1);
    assert_eq!(
        counters.records_read,
        counters.dropped_width + counters.dropped_parse + counters.merged
    );

    let parsed: u64 = result.report.workers.iter().map(|w| w.parsed).sum();
    assert_eq!(parsed, counters.merged);
}

#[tokio::test(flavor = "multi_thread")]
async fn deadline_yields_partial_snapshot() {
    let config = PipelineConfig::default()
        .with_workers(2)
        .with_queue_capacity(4)
        .with_deadline(Duration::from_millis(150));
    let pipeline = Pipeline::new(
        config,
        SlowParser {
            delay: Duration::from_millis(25),
        },
    )
    .unwrap();

    let input = rows(400);
    let started = std::time::Instant::now();
    let result = pipeline.run(csv(&input)).await.unwrap();

    assert_eq!(result.status, RunStatus::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(2));

    let partial = &result.snapshot;
    assert!(partial.total_count < 400);
    assert_eq!(partial.total_count, result.report.counters.merged);

    let category_count: u64 = partial.by_category.values().map(|c| c.count).sum();
    let bucket_count: u64 = partial.distribution.iter().map(|b| b.count).sum();
    let category_sum: f64 = partial.by_category.values().map(|c| c.sum).sum();
    assert_eq!(category_count, partial.total_count);
    assert_eq!(bucket_count, partial.total_count);
    assert!((category_sum - partial.total_sum).abs() < 1e-6);

    let full = run_with(
        PipelineConfig::default().with_deadline(Duration::from_secs(30)),
        &input,
    )
    .await;
    assert_eq!(full.status, RunStatus::Completed);
    assert_eq!(full.snapshot.total_count, 400);
    for (maker, totals) in &partial.by_category {
        let complete = &full.snapshot.by_category[maker];
        assert!(complete.count >= totals.count, "{maker} count");
        assert!(complete.sum >= totals.sum, "{maker} sum");
    }
    for bucket in &partial.distribution {
        assert!(full.snapshot.bucket(&bucket.label) >= bucket.count, "{}", bucket.label);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn generous_deadline_completes() {
    let config = PipelineConfig::default().with_deadline(Duration::from_secs(30));
    let pipeline = Pipeline::new(
        config,
        SlowParser {
            delay: Duration::from_millis(1),
        },
    )
    .unwrap();

    let result = pipeline.run(csv(&rows(30))).await.unwrap();
    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.snapshot.total_count, 30);
}
