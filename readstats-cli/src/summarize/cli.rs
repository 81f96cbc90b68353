use clap::{Arg, Command, arg};

pub const SUMMARIZE_CMD: &str = "summarize";

pub fn create_summarize_cli() -> Command {
    Command::new(SUMMARIZE_CMD)
        .about("Compute outlier-filtered, running and robust statistics for a list of samples.")
        .arg(
            Arg::new("input")
                .required(true)
                .help("File with one numeric sample per line (.gz accepted, '-' for stdin)"),
        )
        .arg(
            arg!(--sorted)
                .help("Samples are already in ascending order; skip sorting")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--window <WINDOW>)
                .required(false)
                .help("Also report running statistics over the last WINDOW samples"),
        )
        .arg(
            Arg::new("ema-alpha")
                .long("ema-alpha")
                .required(false)
                .help("Also report the exponential moving average with this weight, in [0, 1]"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
