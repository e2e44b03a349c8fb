//! Span-conflict resolution. Overlapping raw matches are common (a
//! phone-like digit run inside an IBAN, an email inside a URL); the
//! resolver arbitrates them into a non-overlapping, offset-sorted
//! list with a single deterministic pass.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::detection::{Category, Detection};

/// Same-span tie-break order between categories, highest priority
/// first. Carried as configuration on the engine rather than inferred
/// ad hoc, so resolution stays deterministic and testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Precedence {
    order: Vec<Category>,
}

impl Default for Precedence {
    fn default() -> Self {
        Self {
            order: vec![
                Category::CreditCard,
                Category::Iban,
                Category::Email,
                Category::Url,
                Category::Ssn,
                Category::NationalId,
                Category::Phone,
                Category::IpAddress,
                Category::FinancialAmount,
                Category::Person,
                Category::Organization,
                Category::ImageLogo,
            ],
        }
    }
}

impl Precedence {
    pub fn new(order: Vec<Category>) -> Self {
        Self { order }
    }

    /// Lower rank outranks. Categories missing from the table sort last.
    fn rank(&self, category: Category) -> usize {
        self.order
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.order.len())
    }
}

/// Sorts by start ascending, end descending (longer match first), then
/// category precedence, then confidence descending; the stable sort
/// preserves detector declaration order for full ties. A left-to-right
/// sweep then accepts every match that does not overlap an already
/// accepted one.
pub fn resolve(mut raw: Vec<Detection>, precedence: &Precedence) -> Vec<Detection> {
    raw.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then(precedence.rank(a.category).cmp(&precedence.rank(b.category)))
            .then(
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal),
            )
    });

    let mut accepted: Vec<Detection> = Vec::with_capacity(raw.len());
    let mut max_end = 0usize;
    for detection in raw {
        // Sorted by start, so overlap with any accepted span reduces
        // to a comparison against the furthest end seen so far.
        if detection.start >= max_end {
            max_end = detection.end;
            accepted.push(detection);
        }
    }
    accepted
}
