use clap::{Arg, Command};

pub const DESCRIBE_CMD: &str = "describe";

pub fn create_describe_cli() -> Command {
    Command::new(DESCRIBE_CMD)
        .about("Compute statistics from a histogram table written by `readstats histogram`.")
        .arg(
            Arg::new("table")
                .required(true)
                .help("Histogram table (.gz accepted, '-' for stdin)"),
        )
}
