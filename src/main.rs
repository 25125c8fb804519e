// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use the_tally::config::{load_and_validate_config, PipelineConfig};
use the_tally::engine::{Pipeline, PipelineResult, RunStatus};
use the_tally::observability::init_tracing;
use the_tally::source::open_input;

struct CliArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: &[String]) -> Option<CliArgs> {
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().skip(1).filter(|a| *a != "--json").collect();

    match positional.as_slice() {
        [input] => Some(CliArgs { input: PathBuf::from(input), config: None, json }),
        [input, config] => Some(CliArgs {
            input: PathBuf::from(input),
            config: Some(PathBuf::from(config)),
            json,
        }),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let args: Vec<String> = env::args().collect();
    let Some(cli) = parse_args(&args) else {
        eprintln!("Usage: {} <input.csv> [config.(yaml|toml)] [--json]", args[0]);
        eprintln!("Example: {} data/car_sales.csv", args[0]);
        eprintln!("Example: {} data/car_sales.csv configs/tally.yaml --json", args[0]);
        std::process::exit(1);
    };

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CliArgs) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let input = open_input(&cli.input)?;

    let pipeline = Pipeline::car_sales(config)?;
    let result = pipeline.run(input).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&cli, &result);
    }
    Ok(())
}

fn print_report(cli: &CliArgs, result: &PipelineResult) {
    let snapshot = &result.snapshot;
    let counters = &result.report.counters;

    println!("🚗 Car Sales Tally");
    println!("═══════════════════════════════════");
    println!("Input: {}", cli.input.display());
    println!();

    println!("📊 Total sales: {:.3} thousand units over {} records", snapshot.total_sum, snapshot.total_count);
    println!();

    println!("🏭 Sales by manufacturer:");
    for (maker, totals) in &snapshot.by_category {
        println!("  {:<16} {:>10.3}  ({} models)", maker, totals.sum, totals.count);
    }
    println!();

    println!("🚙 Sales by vehicle type:");
    for (kind, totals) in &snapshot.by_subcategory {
        println!("  {:<16} {:>10.3}", kind, totals.sum);
    }
    println!();

    println!("💰 Price distribution (thousands, width {}):", snapshot.bucket_width);
    for bucket in &snapshot.distribution {
        println!("  {:<10} {}", bucket.label, bucket.count);
    }
    println!();

    println!("🐎 Average horsepower by manufacturer:");
    for (maker, totals) in &snapshot.by_category {
        match totals.average_secondary {
            Some(avg) => println!("  {:<16} {:>8.1}", maker, avg),
            None => println!("  {:<16} {:>8}", maker, "n/a"),
        }
    }
    println!();

    let status = match result.status {
        RunStatus::Completed => "✅ Completed",
        RunStatus::TimedOut => "⏰ Timed out (partial results)",
    };
    println!("{}", "─".repeat(40));
    println!("Status: {}", status);
    println!(
        "Records: {} read, {} merged, {} dropped ({} wrong width, {} unparseable), {} unreadable lines",
        counters.records_read,
        counters.merged,
        counters.dropped(),
        counters.dropped_width,
        counters.dropped_parse,
        counters.read_errors
    );
    println!("⏱️  Elapsed: {} ms", result.report.elapsed_ms);
}
