use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;

use readstats_core::HistogramStatistics;

use crate::utils::{get_dynamic_reader_w_stdin, get_output_writer, read_samples};

pub fn run_histogram(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a samples file is required.");

    let label = matches
        .get_one::<String>("label")
        .expect("--label has a default value");

    let output_path = matches.get_one::<String>("output");
    let print_summary = matches.get_flag("summary");

    let reader = get_dynamic_reader_w_stdin(input)?;
    let samples: Vec<u64> = read_samples(reader)
        .with_context(|| format!("{} must hold non-negative integers", input))?;

    let histogram: HistogramStatistics = samples.into_iter().collect();

    let mut writer = get_output_writer(output_path)?;
    histogram
        .write_histogram(&mut writer, label)
        .context("Failed to write histogram table")?;
    writer.flush()?;

    if let Some(p) = output_path {
        eprintln!("Histogram written to {}", p);
    }

    if print_summary {
        let json = serde_json::to_string_pretty(histogram.summary())
            .context("Failed to serialize summary to JSON")?;
        eprintln!("{}", json);
    }

    Ok(())
}
