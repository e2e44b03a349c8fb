use std::fs;

use anyhow::{Context, Result};
use docveil_core::Engine;
use serde_json::json;

use crate::logging;

pub fn run(a: String, b: String, threshold: f64) -> Result<()> {
    let bytes_a = fs::read(&a).with_context(|| format!("failed to read {a}"))?;
    let bytes_b = fs::read(&b).with_context(|| format!("failed to read {b}"))?;
    let engine = Engine::new();
    let result = engine.compare_images(&bytes_a, &bytes_b, threshold);
    if let Some(fp) = engine.fingerprint_image(&bytes_a) {
        logging::verbose(format!("{a}: {} ({}x{})", fp.hash, fp.width, fp.height));
    }
    println!(
        "{}",
        json!({
            "is_match": result.is_match,
            "similarity": result.similarity,
            "threshold": threshold,
        })
    );
    Ok(())
}
