use std::env;

use serde::Deserialize;

use docveil_core::{Category, DetectConfig};

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub output_root: String,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub detection: DetectionSection,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "*.txt,*.md,*.log,*.csv".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct DetectionSection {
    /// Category names (snake_case) to exclude from scanning.
    #[serde(default)]
    pub disabled_categories: Vec<String>,
    #[serde(default)]
    pub custom_names: Vec<String>,
    #[serde(default)]
    pub custom_organizations: Vec<String>,
    #[serde(default)]
    pub min_confidence: Option<f32>,
}

impl DetectionSection {
    pub fn to_detect_config(&self) -> DetectConfig {
        let mut config = DetectConfig::default();
        for name in &self.disabled_categories {
            if let Some(category) = parse_category(name) {
                config.enabled_categories.remove(&category);
            } else {
                crate::logging::info(format!("ignoring unknown category {name:?}"));
            }
        }
        config.custom_names = self.custom_names.clone();
        config.custom_organizations = self.custom_organizations.clone();
        if let Some(min) = self.min_confidence {
            config.min_confidence = min;
        }
        config
    }
}

fn parse_category(name: &str) -> Option<Category> {
    serde_json::from_value(serde_json::Value::String(name.trim().to_string())).ok()
}

/// Env-var overrides for one-shot `scan`/`redact` invocations, where
/// no config file is in play.
pub fn detect_config_from_env() -> DetectConfig {
    let mut config = DetectConfig::default();
    if let Some(min) = env::var("DOCVEIL_MIN_CONFIDENCE")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.min_confidence = min;
    }
    if let Ok(names) = env::var("DOCVEIL_CUSTOM_NAMES") {
        config.custom_names = split_list(&names);
    }
    if let Ok(orgs) = env::var("DOCVEIL_CUSTOM_ORGANIZATIONS") {
        config.custom_organizations = split_list(&orgs);
    }
    config
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
