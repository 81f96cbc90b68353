use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use readstats_core::OnlineStdDev;
use readstats_core::batch::{
    compute_exponential_moving_average, compute_median_absolute_deviation, compute_mode,
    compute_std_dev,
};

use crate::utils::{get_dynamic_reader_w_stdin, get_output_writer, read_samples};

#[derive(Serialize, Debug, PartialEq)]
struct SummarizeOutput {
    number_of_samples: usize,
    filtered: MeanStdDev,
    mode: f64,
    median: f64,
    mad: f64,
    running: MeanStdDev,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<WindowStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ema: Option<f64>,
}

#[derive(Serialize, Debug, PartialEq)]
struct MeanStdDev {
    mean: f64,
    stddev: f64,
}

#[derive(Serialize, Debug, PartialEq)]
struct WindowStats {
    size: u32,
    mean: f64,
    stddev: f64,
}

impl From<&OnlineStdDev> for MeanStdDev {
    fn from(sd: &OnlineStdDev) -> Self {
        MeanStdDev {
            mean: sd.mean(),
            stddev: sd.stddev(),
        }
    }
}

fn summarize(
    samples: &[f64],
    is_sorted: bool,
    window: Option<usize>,
    ema_alpha: Option<f64>,
) -> SummarizeOutput {
    let (mean, stddev) = compute_std_dev(samples, is_sorted);
    let mode = compute_mode(samples, is_sorted);
    let (median, mad) = compute_median_absolute_deviation(samples, is_sorted);

    let mut running = OnlineStdDev::new();
    samples.iter().for_each(|&v| running.insert(v));
    running.finalize();

    let window = window.map(|width| {
        let mut sd = OnlineStdDev::new();
        for (i, &v) in samples.iter().enumerate() {
            sd.insert(v);
            if i >= width {
                sd.remove(samples[i - width]);
            }
        }
        sd.finalize();

        WindowStats {
            size: sd.size(),
            mean: sd.mean(),
            stddev: sd.stddev(),
        }
    });

    let ema = ema_alpha.and_then(|alpha| {
        let (&first, rest) = samples.split_first()?;
        Some(
            rest.iter()
                .fold(first, |ema, &v| compute_exponential_moving_average(alpha, ema, v)),
        )
    });

    SummarizeOutput {
        number_of_samples: samples.len(),
        filtered: MeanStdDev { mean, stddev },
        mode,
        median,
        mad,
        running: MeanStdDev::from(&running),
        window,
        ema,
    }
}

pub fn run_summarize(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a samples file is required.");

    let is_sorted = matches.get_flag("sorted");
    let output_path = matches.get_one::<String>("output");

    let window: Option<usize> = match matches.get_one::<String>("window") {
        Some(w) => {
            let w: usize = w.parse().context("--window must be a positive integer")?;
            if w == 0 {
                anyhow::bail!("--window must be a positive integer");
            }
            Some(w)
        }
        None => None,
    };

    let ema_alpha: Option<f64> = match matches.get_one::<String>("ema-alpha") {
        Some(a) => {
            let a: f64 = a.parse().context("--ema-alpha must be a number")?;
            if !(0.0..=1.0).contains(&a) {
                anyhow::bail!("--ema-alpha must lie in [0, 1], got {}", a);
            }
            Some(a)
        }
        None => None,
    };

    let reader = get_dynamic_reader_w_stdin(input)?;
    let samples: Vec<f64> = read_samples(reader)?;

    if samples.is_empty() {
        eprintln!("No samples found in {}, reporting zeros.", input);
    }

    if is_sorted && samples.windows(2).any(|w| w[0] > w[1]) {
        anyhow::bail!("--sorted was given but {} is not in ascending order", input);
    }

    let output = summarize(&samples, is_sorted, window, ema_alpha);

    let json =
        serde_json::to_string_pretty(&output).context("Failed to serialize output to JSON")?;

    let mut writer = get_output_writer(output_path)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;

    if let Some(p) = output_path {
        eprintln!("Output written to {}", p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_summarize_empty() {
        let output = summarize(&[], false, Some(3), Some(0.5));

        assert_eq!(output.number_of_samples, 0);
        assert_eq!(output.filtered, MeanStdDev { mean: 0.0, stddev: 0.0 });
        assert_eq!((output.mode, output.median, output.mad), (0.0, 0.0, 0.0));
        assert_eq!(output.running, MeanStdDev { mean: 0.0, stddev: 0.0 });
        assert_eq!(output.ema, None);
        assert_eq!(output.window.unwrap().size, 0);
    }

    #[rstest]
    fn test_summarize_window_and_ema() {
        let samples = [1.0, 2.0, 2.0, 10.0, 12.0];
        let output = summarize(&samples, false, Some(2), Some(0.5));

        assert_eq!(output.mode, 2.0);
        assert_eq!(output.median, 2.0);

        let window = output.window.unwrap();
        assert_eq!(window.size, 2);
        assert!((window.mean - 11.0).abs() < 1e-9);

        // ((((1 + 2) / 2 + 2) / 2 + 10) / 2 + 12) / 2
        assert_eq!(output.ema, Some(8.9375));
    }

    #[rstest]
    fn test_output_omits_absent_sections() {
        let output = summarize(&[4.0, 5.0], false, None, None);
        let json = serde_json::to_string(&output).unwrap();

        assert!(!json.contains("window"));
        assert!(!json.contains("ema"));
        assert!(json.contains("\"number_of_samples\":2"));
    }
}
