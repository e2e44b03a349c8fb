//! The detector set: independent, stateless pattern matchers, one per
//! sensitive-data category. Detectors share no mutable state and are
//! evaluated in parallel over the same read-only buffer; a panicking
//! detector is isolated and contributes zero matches.

mod contact;
mod financial;
mod identity;
mod names;

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::warn;

use crate::detection::{Category, Detection};
use crate::engine::DetectConfig;

pub use financial::{iban_checksum_ok, luhn_valid};

pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> Category;
    fn detect(&self, text: &str) -> Vec<Detection>;
}

/// Builds the detector set in fixed declaration order. The order is
/// part of the determinism contract: the resolver falls back to it for
/// full ties.
pub fn registry(config: &DetectConfig) -> Vec<Box<dyn Detector>> {
    let mut detectors: Vec<Box<dyn Detector>> = vec![
        Box::new(contact::EmailDetector),
        Box::new(contact::PhoneDetector),
        Box::new(identity::SsnDetector),
        Box::new(identity::NationalIdDetector),
        Box::new(financial::CreditCardDetector),
        Box::new(financial::IbanDetector),
        Box::new(contact::IpAddressDetector),
        Box::new(contact::UrlDetector),
        Box::new(financial::AmountDetector),
        Box::new(names::PersonDetector::new(config.custom_names.clone())),
        Box::new(names::OrganizationDetector::new(
            config.custom_organizations.clone(),
        )),
    ];
    detectors.retain(|d| config.enabled_categories.contains(&d.category()));
    detectors
}

/// Runs every detector over the buffer and concatenates the raw
/// matches in declaration order. Spans that fall outside the buffer or
/// off char boundaries are dropped rather than poisoning the resolver.
pub fn run_all(detectors: &[Box<dyn Detector>], text: &str) -> Vec<Detection> {
    detectors
        .par_iter()
        .map(|detector| {
            match catch_unwind(AssertUnwindSafe(|| detector.detect(text))) {
                Ok(mut found) => {
                    found.retain(|d| valid_span(d, text));
                    found
                }
                Err(_) => {
                    warn!(detector = detector.name(), "detector panicked; skipping");
                    Vec::new()
                }
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn valid_span(d: &Detection, text: &str) -> bool {
    d.start < d.end
        && d.end <= text.len()
        && text.is_char_boundary(d.start)
        && text.is_char_boundary(d.end)
        && (0.0..=1.0).contains(&d.confidence)
}
