use once_cell::sync::Lazy;
use regex::Regex;

use crate::detection::{Category, Detection};
use crate::detectors::Detector;

/// Card-industry mod-10 check digit (Luhn).
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    for ch in digits.chars().rev() {
        let Some(d) = ch.to_digit(10) else {
            return false;
        };
        let mut d = d;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }
    !digits.is_empty() && sum % 10 == 0
}

/// Published IBAN validation: rotate the first four characters to the
/// end, map letters to 10..35, and check the big number mod 97 == 1.
/// Computed incrementally so no bignum is needed.
pub fn iban_checksum_ok(iban: &str) -> bool {
    let rotated = iban
        .chars()
        .skip(4)
        .chain(iban.chars().take(4))
        .collect::<String>();
    let mut rem = 0u64;
    for ch in rotated.chars() {
        let v = match ch {
            '0'..='9' => ch as u64 - '0' as u64,
            'A'..='Z' => ch as u64 - 'A' as u64 + 10,
            _ => return false,
        };
        rem = if v < 10 {
            (rem * 10 + v) % 97
        } else {
            (rem * 100 + v) % 97
        };
    }
    rem == 1
}

pub struct CreditCardDetector;

static CARD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d(?:[ -]?\d){12,18}\b").unwrap());

impl Detector for CreditCardDetector {
    fn name(&self) -> &'static str {
        "credit_card"
    }

    fn category(&self) -> Category {
        Category::CreditCard
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        CARD_RE
            .find_iter(text)
            .filter_map(|m| {
                let digits: String =
                    m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
                if !(13..=19).contains(&digits.len()) {
                    return None;
                }
                // Failing Luhn is reported, not rejected: the resolver
                // and operator get to judge the candidate.
                let confidence = if luhn_valid(&digits) { 0.95 } else { 0.4 };
                Some(Detection {
                    category: Category::CreditCard,
                    start: m.start(),
                    end: m.end(),
                    matched_text: m.as_str().to_string(),
                    confidence,
                    source: self.name(),
                })
            })
            .collect()
    }
}

pub struct IbanDetector;

static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b").unwrap());

/// Registry lengths for the countries the engine recognizes. A prefix
/// outside this table is not treated as an IBAN at all.
fn iban_length(country: &str) -> Option<usize> {
    let len = match country {
        "AE" => 23,
        "BH" => 22,
        "DE" => 22,
        "EG" => 29,
        "ES" => 24,
        "FR" => 27,
        "GB" => 22,
        "IT" => 27,
        "JO" => 30,
        "KW" => 30,
        "NL" => 18,
        "QA" => 29,
        "SA" => 24,
        "TR" => 26,
        _ => return None,
    };
    Some(len)
}

impl Detector for IbanDetector {
    fn name(&self) -> &'static str {
        "iban"
    }

    fn category(&self) -> Category {
        Category::Iban
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        IBAN_RE
            .find_iter(text)
            .filter_map(|m| {
                let candidate = m.as_str();
                let expected = iban_length(&candidate[..2])?;
                if candidate.len() != expected {
                    return None;
                }
                let confidence = if iban_checksum_ok(candidate) { 0.95 } else { 0.6 };
                Some(Detection {
                    category: Category::Iban,
                    start: m.start(),
                    end: m.end(),
                    matched_text: candidate.to_string(),
                    confidence,
                    source: self.name(),
                })
            })
            .collect()
    }
}

pub struct AmountDetector;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[$€£¥]|\b(?:USD|EUR|GBP|JPY|SAR|AED|KWD|QAR|BHD)\b)\s?\d{1,3}(?:,\d{3})*(?:\.\d{1,2})?")
        .unwrap()
});

impl Detector for AmountDetector {
    fn name(&self) -> &'static str {
        "financial_amount"
    }

    fn category(&self) -> Category {
        Category::FinancialAmount
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        AMOUNT_RE
            .find_iter(text)
            .map(|m| Detection {
                category: Category::FinancialAmount,
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
                confidence: 0.85,
                source: self.name(),
            })
            .collect()
    }
}
