mod cli;
mod ledger;
mod output;
mod scanner;
mod units;

use anyhow::Result;
use clap::Parser;
use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so progress and JSON on stdout stay clean
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    output::run(&args)
}
