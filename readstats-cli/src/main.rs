mod describe;
mod histogram;
mod summarize;
mod utils;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "readstats";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Summary statistics for read length, overlap length and coverage distributions.")
        .subcommand_required(true)
        .subcommand(summarize::cli::create_summarize_cli())
        .subcommand(histogram::cli::create_histogram_cli())
        .subcommand(describe::cli::create_describe_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // BATCH + RUNNING STATISTICS
        //
        Some((summarize::cli::SUMMARIZE_CMD, matches)) => {
            summarize::handlers::run_summarize(matches)?;
        }

        //
        // HISTOGRAM TABLE
        //
        Some((histogram::cli::HISTOGRAM_CMD, matches)) => {
            histogram::handlers::run_histogram(matches)?;
        }

        //
        // STATISTICS OF AN EXISTING TABLE
        //
        Some((describe::cli::DESCRIBE_CMD, matches)) => {
            describe::handlers::run_describe(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
