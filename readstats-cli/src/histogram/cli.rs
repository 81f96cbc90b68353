use clap::{Arg, Command, arg};

use readstats_core::consts::DEFAULT_HISTOGRAM_LABEL;

pub const HISTOGRAM_CMD: &str = "histogram";

pub fn create_histogram_cli() -> Command {
    Command::new(HISTOGRAM_CMD)
        .about("Build a histogram of non-negative integer samples and write it as a two column table.")
        .arg(
            Arg::new("input")
                .required(true)
                .help("File with one integer sample per line (.gz accepted, '-' for stdin)"),
        )
        .arg(
            arg!(--label <LABEL>)
                .required(false)
                .default_value(DEFAULT_HISTOGRAM_LABEL)
                .help("Name of the value column in the table header"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output table path (default: stdout)"),
        )
        .arg(
            arg!(--summary)
                .help("Print the histogram statistics as JSON to stderr")
                .action(clap::ArgAction::SetTrue),
        )
}
