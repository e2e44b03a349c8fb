use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use docveil_core::{
    DetectConfig, DetectionReport, Engine, FormatDecoder, FormatEncoder, PlainTextDecoder,
    PlainTextEncoder,
};

use crate::{config, logging};

pub fn run(
    input: String,
    output: String,
    disable: Option<String>,
    report_path: Option<String>,
) -> Result<()> {
    let detect_config = config::detect_config_from_env();
    let overrides = parse_disabled(disable.as_deref())?;
    let report = redact_file(
        Path::new(&input),
        Path::new(&output),
        &detect_config,
        &overrides,
    )?;
    logging::stage(
        "redact",
        format!("{input}: {} detections -> {output}", report.detections.len()),
    );
    if let Some(report_path) = report_path {
        fs::write(&report_path, serde_json::to_vec_pretty(&report)?)
            .with_context(|| format!("failed to write report {report_path}"))?;
    }
    Ok(())
}

/// Full single-document pipeline: decode, detect, apply, encode.
pub fn redact_file(
    input: &Path,
    output: &Path,
    detect_config: &DetectConfig,
    overrides: &HashMap<usize, bool>,
) -> Result<DetectionReport> {
    let bytes =
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let document = PlainTextDecoder
        .decode(&bytes, None)
        .with_context(|| format!("failed to decode {}", input.display()))?;
    let engine = Engine::new();
    let report = engine.detect(&document.text, detect_config);
    let outcome = engine.redact(&document.nodes, &report, overrides)?;
    let encoded = PlainTextEncoder.encode(&outcome.nodes)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, encoded)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(report)
}

/// `--disable 3,7` marks those detection ids as not-to-redact; they
/// stay in the report either way.
fn parse_disabled(raw: Option<&str>) -> Result<HashMap<usize, bool>> {
    let mut overrides = HashMap::new();
    if let Some(raw) = raw {
        for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
            let id: usize = part
                .trim()
                .parse()
                .with_context(|| format!("invalid detection id {part:?}"))?;
            overrides.insert(id, false);
        }
    }
    Ok(overrides)
}
