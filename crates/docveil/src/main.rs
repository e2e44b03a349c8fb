mod cli;
mod compare;
mod config;
mod logging;
mod redact;
mod run;
mod scan;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = if cli.verbose {
        true
    } else {
        logging::env_flag()
    };
    logging::init(verbose);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match cli.command {
        Command::Scan { input, json } => scan::run(input, json),
        Command::Redact {
            input,
            output,
            disable,
            report,
        } => redact::run(input, output, disable, report),
        Command::CompareImages { a, b, threshold } => compare::run(a, b, threshold),
        Command::Run { config } => run::run_from_config(&config),
    }
}
