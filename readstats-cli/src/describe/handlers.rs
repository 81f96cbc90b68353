use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use readstats_core::{HistogramStatistics, HistogramSummary};

use crate::utils::get_dynamic_reader_w_stdin;

#[derive(Serialize, Debug)]
struct DescribeOutput {
    label: String,
    histogram_max: u64,
    #[serde(flatten)]
    summary: HistogramSummary,
}

fn describe(table: &str) -> Result<DescribeOutput> {
    let reader = get_dynamic_reader_w_stdin(table)?;
    let (label, histogram) = HistogramStatistics::read_histogram(reader)
        .with_context(|| format!("Failed to read histogram table: {}", table))?;

    Ok(DescribeOutput {
        label,
        histogram_max: histogram.histogram_max(),
        summary: *histogram.summary(),
    })
}

pub fn run_describe(matches: &ArgMatches) -> Result<()> {
    let table = matches
        .get_one::<String>("table")
        .expect("A path to a histogram table is required.");

    let output = describe(table)?;

    let json =
        serde_json::to_string_pretty(&output).context("Failed to serialize output to JSON")?;

    io::stdout().write_all(json.as_bytes())?;
    println!(); // trailing newline

    Ok(())
}
