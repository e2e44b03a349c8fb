use once_cell::sync::Lazy;
use regex::Regex;

use crate::detection::{Category, Detection};
use crate::detectors::financial::luhn_valid;
use crate::detectors::Detector;

pub struct SsnDetector;

static SSN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{3})-(\d{2})-(\d{4})\b").unwrap());

impl Detector for SsnDetector {
    fn name(&self) -> &'static str {
        "ssn"
    }

    fn category(&self) -> Category {
        Category::Ssn
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        SSN_RE
            .captures_iter(text)
            .map(|caps| {
                let m = caps.get(0).unwrap();
                // No public checksum exists for SSNs; implausible
                // area/group/serial values lower confidence instead.
                let area = &caps[1];
                let plausible = area != "000"
                    && area != "666"
                    && !area.starts_with('9')
                    && &caps[2] != "00"
                    && &caps[3] != "0000";
                Detection {
                    category: Category::Ssn,
                    start: m.start(),
                    end: m.end(),
                    matched_text: m.as_str().to_string(),
                    confidence: if plausible { 0.9 } else { 0.5 },
                    source: self.name(),
                }
            })
            .collect()
    }
}

pub struct NationalIdDetector;

/// Saudi national ID / Iqama: ten digits, leading 1 (citizen) or
/// 2 (resident), Luhn-style check digit over the full number.
static NATIONAL_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[12]\d{9}\b").unwrap());

impl Detector for NationalIdDetector {
    fn name(&self) -> &'static str {
        "national_id"
    }

    fn category(&self) -> Category {
        Category::NationalId
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        NATIONAL_ID_RE
            .find_iter(text)
            .map(|m| {
                let confidence = if luhn_valid(m.as_str()) { 0.9 } else { 0.5 };
                Detection {
                    category: Category::NationalId,
                    start: m.start(),
                    end: m.end(),
                    matched_text: m.as_str().to_string(),
                    confidence,
                    source: self.name(),
                }
            })
            .collect()
    }
}
