use std::fs;

use anyhow::{Context, Result};
use docveil_core::{DetectConfig, DetectionReport, Engine, FormatDecoder, PlainTextDecoder};

use crate::{config, logging};

pub fn run(input: String, json: bool) -> Result<()> {
    let detect_config = config::detect_config_from_env();
    let report = scan_file(&input, &detect_config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.detections {
            println!(
                "{:>4}  {:<16} {:>5.2}  {:<14} {}",
                d.id, d.category, d.confidence, d.placeholder, d.matched_text
            );
        }
        for (category, count) in &report.counts {
            logging::stage("scan", format!("{category}: {count}"));
        }
    }
    Ok(())
}

pub fn scan_file(path: &str, detect_config: &DetectConfig) -> Result<DetectionReport> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
    let document = PlainTextDecoder
        .decode(&bytes, None)
        .with_context(|| format!("failed to decode {path}"))?;
    logging::verbose(format!("scanning {path} ({} bytes)", document.text.len()));
    let engine = Engine::new();
    Ok(engine.detect(&document.text, detect_config))
}
