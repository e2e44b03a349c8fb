use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "docveil", about = "docveil detection & redaction CLI")]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect sensitive spans in one document and print the report.
    Scan {
        input: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Detect and rewrite one document with placeholders.
    Redact {
        input: String,
        #[arg(long)]
        output: String,
        /// Comma-separated detection ids to leave unredacted.
        #[arg(long)]
        disable: Option<String>,
        /// Where to write the JSON detection report sidecar.
        #[arg(long)]
        report: Option<String>,
    },
    /// Compare two images by perceptual hash.
    CompareImages {
        a: String,
        b: String,
        #[arg(long, default_value_t = 85.0)]
        threshold: f64,
    },
    /// Batch-redact the sources declared in a config file.
    Run {
        #[arg(long, default_value = "docveil.yaml")]
        config: String,
    },
}
