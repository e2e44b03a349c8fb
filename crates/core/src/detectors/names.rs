use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::detection::{Category, Detection};
use crate::detectors::Detector;

/// Common sentence-initial and function words that start a capitalized
/// run without being part of a name.
const STOPLIST: &[&str] = &[
    "The", "This", "That", "These", "Those", "A", "An", "In", "On", "At", "From", "To",
    "For", "With", "And", "But", "Or", "If", "When", "While", "After", "Before", "Dear",
    "Best", "Kind", "Regards", "Sincerely", "Thank", "Thanks", "Please", "Our", "Your",
    "My", "His", "Her", "Its", "Their", "We", "They", "He", "She", "It", "As", "By",
    "Of", "Not", "New", "Per", "Re",
];

static CAP_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)+\b").unwrap());

fn compile_custom(names: &[String]) -> Vec<Regex> {
    names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .filter_map(|n| {
            // An escaped literal can still fail to compile (regex size
            // limit); skip it rather than poison the whole detector.
            match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(n.trim()))) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!(%err, "skipping uncompilable custom entry");
                    None
                }
            }
        })
        .collect()
}

fn custom_matches(
    patterns: &[Regex],
    text: &str,
    category: Category,
    source: &'static str,
) -> Vec<Detection> {
    let mut out = Vec::new();
    for re in patterns {
        for m in re.find_iter(text) {
            out.push(Detection {
                category,
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
                confidence: 1.0,
                source,
            });
        }
    }
    out
}

pub struct PersonDetector {
    custom: Vec<Regex>,
}

impl PersonDetector {
    pub fn new(custom_names: Vec<String>) -> Self {
        Self {
            custom: compile_custom(&custom_names),
        }
    }
}

impl Detector for PersonDetector {
    fn name(&self) -> &'static str {
        "person"
    }

    fn category(&self) -> Category {
        Category::Person
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        // Explicit user-supplied names bypass the heuristic entirely.
        let mut out = custom_matches(&self.custom, text, Category::Person, "custom_names");
        for m in CAP_RUN_RE.find_iter(text) {
            let mut start = m.start();
            let mut tokens: Vec<&str> = m.as_str().split(' ').collect();
            // Shed stoplisted leading words ("The Acme Report" -> "Acme Report").
            while !tokens.is_empty() && STOPLIST.contains(&tokens[0]) {
                start += tokens[0].len() + 1;
                tokens.remove(0);
            }
            if tokens.len() < 2 {
                continue;
            }
            // Longer capitalized runs are stronger name signals.
            let confidence = (0.6 + 0.05 * (tokens.len() as f32 - 2.0)).min(0.8);
            let matched = &text[start..m.end()];
            out.push(Detection {
                category: Category::Person,
                start,
                end: m.end(),
                matched_text: matched.to_string(),
                confidence,
                source: self.name(),
            });
        }
        out
    }
}

pub struct OrganizationDetector {
    custom: Vec<Regex>,
}

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        // Longer suffixes first: alternation in the regex crate is
        // leftmost-first, so "Corp" must not shadow "Corporation".
        r"\b[A-Z][A-Za-z&]*(?: [A-Z][A-Za-z&]*){0,4} (?:Incorporated|Inc\.?|Corporation|Corp\.?|Ltd\.?|LLC|Company|Co\.|Est\.)",
    )
    .unwrap()
});

impl OrganizationDetector {
    pub fn new(custom_organizations: Vec<String>) -> Self {
        Self {
            custom: compile_custom(&custom_organizations),
        }
    }
}

impl Detector for OrganizationDetector {
    fn name(&self) -> &'static str {
        "organization"
    }

    fn category(&self) -> Category {
        Category::Organization
    }

    fn detect(&self, text: &str) -> Vec<Detection> {
        let mut out = custom_matches(
            &self.custom,
            text,
            Category::Organization,
            "custom_organizations",
        );
        for m in ORG_RE.find_iter(text) {
            out.push(Detection {
                category: Category::Organization,
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
                confidence: 0.85,
                source: self.name(),
            });
        }
        out
    }
}
