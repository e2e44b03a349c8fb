use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use docveil_core::DetectConfig;
use serde_yaml::from_str;
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::{logging, redact};

pub fn run_from_config(path: &str) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
    let cfg: RunConfig = from_str(&raw).context("invalid docveil config")?;
    run_pipeline(cfg, |input, output, detect_config| {
        let report = redact::redact_file(input, output, detect_config, &HashMap::new())?;
        Ok(report.detections.len())
    })
}

/// Walks every configured source and redacts each matching file into
/// the output root. One failing document reports its error and the
/// batch continues; the run only fails if nothing was processed or a
/// source is misconfigured.
fn run_pipeline<F>(cfg: RunConfig, process: F) -> Result<()>
where
    F: Fn(&Path, &Path, &DetectConfig) -> Result<usize>,
{
    if cfg.sources.is_empty() {
        return Err(anyhow!("run config must declare at least one source"));
    }
    let output_root = PathBuf::from(&cfg.output_root);
    fs::create_dir_all(&output_root)?;
    let detect_config = cfg.detection.to_detect_config();

    let mut processed = 0usize;
    let mut failed = 0usize;
    for (idx, source) in cfg.sources.iter().enumerate() {
        logging::info(format!(
            "source {}: path={} pattern={}",
            idx + 1,
            source.path,
            source.pattern
        ));
        for entry in WalkDir::new(&source.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            if !matches_pattern(&name, &source.pattern) {
                continue;
            }
            let output = output_root.join(entry.file_name());
            match process(entry.path(), &output, &detect_config) {
                Ok(count) => {
                    processed += 1;
                    logging::stage(
                        "run",
                        format!("{}: {count} detections", entry.path().display()),
                    );
                }
                Err(err) => {
                    failed += 1;
                    logging::stage("run", format!("{}: {err}", entry.path().display()));
                }
            }
        }
    }
    logging::info(format!("processed {processed} documents, {failed} failed"));
    if processed == 0 && failed > 0 {
        return Err(anyhow!("every document in the batch failed"));
    }
    Ok(())
}

fn matches_pattern(name: &str, pattern: &str) -> bool {
    pattern.split(',').map(str::trim).any(|part| {
        if let Some(suffix) = part.strip_prefix('*') {
            name.ends_with(suffix)
        } else {
            name == part
        }
    })
}
