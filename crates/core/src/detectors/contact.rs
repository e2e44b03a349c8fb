use once_cell::sync::Lazy;
use regex::Regex;

use crate::detection::{Category, Detection};
use crate::detectors::Detector;

pub struct EmailDetector;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}\b").unwrap()
});

impl Detector for EmailDetector {
    fn name(&self) -> &'static str {
        "email"
    }

    fn category(&self) -> Category {
        Category::Email
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        EMAIL_RE
            .find_iter(text)
            .map(|m| Detection {
                category: Category::Email,
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
                confidence: 0.95,
                source: self.name(),
            })
            .collect()
    }
}

pub struct PhoneDetector;

/// (pattern, confidence): stricter canonical formats score higher, a
/// bare ten-digit run is the weakest candidate.
static PHONE_PATTERNS: Lazy<Vec<(Regex, f32)>> = Lazy::new(|| {
    vec![
        // International, e.g. +1 415 555 0100 or +966501234567
        (
            Regex::new(r"\+\d{1,3}[ .-]?\d{2,4}(?:[ .-]?\d{2,4}){1,3}").unwrap(),
            0.95,
        ),
        // Parenthesized area code, e.g. (415) 555-0100
        (Regex::new(r"\(\d{3}\)\s?\d{3}[ .-]?\d{4}").unwrap(), 0.9),
        // Saudi mobile, e.g. 0501234567
        (Regex::new(r"\b05\d{8}\b").unwrap(), 0.9),
        // Dashed, e.g. 415-555-0100
        (Regex::new(r"\b\d{3}-\d{3}-\d{4}\b").unwrap(), 0.85),
        // Bare ten digits; ambiguous with other ids, resolver arbitrates
        (Regex::new(r"\b\d{10}\b").unwrap(), 0.7),
    ]
});

impl Detector for PhoneDetector {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn category(&self) -> Category {
        Category::Phone
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        let mut out = Vec::new();
        for (re, confidence) in PHONE_PATTERNS.iter() {
            for m in re.find_iter(text) {
                let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
                if !(7..=15).contains(&digits) {
                    continue;
                }
                out.push(Detection {
                    category: Category::Phone,
                    start: m.start(),
                    end: m.end(),
                    matched_text: m.as_str().to_string(),
                    confidence: *confidence,
                    source: self.name(),
                });
            }
        }
        out
    }
}

pub struct IpAddressDetector;

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b").unwrap());

impl Detector for IpAddressDetector {
    fn name(&self) -> &'static str {
        "ip_address"
    }

    fn category(&self) -> Category {
        Category::IpAddress
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        IPV4_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let all_valid = (1..=4)
                    .all(|i| caps[i].parse::<u16>().map(|v| v <= 255).unwrap_or(false));
                if !all_valid {
                    return None;
                }
                let m = caps.get(0).unwrap();
                Some(Detection {
                    category: Category::IpAddress,
                    start: m.start(),
                    end: m.end(),
                    matched_text: m.as_str().to_string(),
                    confidence: 0.95,
                    source: self.name(),
                })
            })
            .collect()
    }
}

pub struct UrlDetector;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b(?:https?|ftp)://[^\s<>"']+"#).unwrap());

impl Detector for UrlDetector {
    fn name(&self) -> &'static str {
        "url"
    }

    fn category(&self) -> Category {
        Category::Url
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        URL_RE
            .find_iter(text)
            .map(|m| {
                // Trailing sentence punctuation is not part of the URL.
                let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
                Detection {
                    category: Category::Url,
                    start: m.start(),
                    end: m.start() + trimmed.len(),
                    matched_text: trimmed.to_string(),
                    confidence: 0.9,
                    source: self.name(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_emails() {
        let found = EmailDetector.detect("Contact test@example.com or bob@example.com");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].matched_text, "test@example.com");
        assert_eq!(found[1].matched_text, "bob@example.com");
        assert!((found[0].confidence - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn phone_formats_score_by_strictness() {
        let intl = PhoneDetector.detect("call +966 50 123 4567 now");
        assert!(intl.iter().any(|d| d.confidence >= 0.95));
        let bare = PhoneDetector.detect("ref 4155550100 end");
        assert!(bare.iter().all(|d| d.confidence <= 0.7));
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(IpAddressDetector.detect("999.1.1.1 is not an address").is_empty());
        let found = IpAddressDetector.detect("host 192.168.0.12 up");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "192.168.0.12");
    }

    #[test]
    fn url_drops_trailing_punctuation() {
        let found = UrlDetector.detect("see https://example.com/a/b.");
        assert_eq!(found[0].matched_text, "https://example.com/a/b");
    }
}
