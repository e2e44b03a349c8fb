use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of sensitive-data categories the engine can report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Email,
    Phone,
    Ssn,
    NationalId,
    CreditCard,
    Iban,
    IpAddress,
    Url,
    FinancialAmount,
    Person,
    Organization,
    ImageLogo,
}

impl Category {
    /// Uppercase stem used inside placeholder tokens (`<EMAIL_1>`).
    /// The token shape is an external contract; downstream tooling
    /// parses it.
    pub fn placeholder_stem(&self) -> &'static str {
        match self {
            Category::Email => "EMAIL",
            Category::Phone => "PHONE",
            Category::Ssn => "SSN",
            Category::NationalId => "NATIONAL_ID",
            Category::CreditCard => "CREDIT_CARD",
            Category::Iban => "IBAN",
            Category::IpAddress => "IP_ADDRESS",
            Category::Url => "URL",
            Category::FinancialAmount => "FINANCIAL_AMOUNT",
            Category::Person => "PERSON",
            Category::Organization => "ORGANIZATION",
            Category::ImageLogo => "IMAGE_LOGO",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Email,
            Category::Phone,
            Category::Ssn,
            Category::NationalId,
            Category::CreditCard,
            Category::Iban,
            Category::IpAddress,
            Category::Url,
            Category::FinancialAmount,
            Category::Person,
            Category::Organization,
            Category::ImageLogo,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width specifiers working in tabular CLI output.
        f.pad(self.placeholder_stem())
    }
}

/// A raw match from one detector. Offsets are byte offsets into the
/// canonical UTF-8 buffer, `end` exclusive, always on char boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub category: Category,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub confidence: f32,
    pub source: &'static str,
}

impl Detection {
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn same_span(&self, other: &Detection) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// A detection promoted by the resolver: non-overlapping with its
/// siblings, placeholder assigned, and individually toggleable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedDetection {
    pub id: usize,
    pub category: Category,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub confidence: f32,
    pub source: &'static str,
    pub enabled: bool,
    pub placeholder: String,
}

/// A recurring-image match reported alongside the text detections.
/// Images carry no text span; the encoder collaborator uses the
/// `image_id` to locate the flagged image in the original document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoFinding {
    pub image_id: String,
    pub fingerprint: String,
    pub similarity: f64,
    pub enabled: bool,
    pub placeholder: String,
}

/// Output of one `detect` call over one document.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DetectionReport {
    pub detections: Vec<AcceptedDetection>,
    pub logos: Vec<LogoFinding>,
    pub counts: BTreeMap<Category, usize>,
    pub text_len: usize,
}

impl DetectionReport {
    pub fn total(&self) -> usize {
        self.detections.len() + self.logos.len()
    }
}
