//! Deterministic placeholder assignment. Each distinct normalized
//! value gets one `<CATEGORY_n>` token, numbered in first-seen order;
//! the map is a per-document value, never process-wide state.

use std::collections::HashMap;

use crate::detection::Category;

#[derive(Debug, Default, Clone)]
pub struct PlaceholderMap {
    tokens: HashMap<(Category, String), String>,
    counters: HashMap<Category, usize>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for this value, minting one on first sight.
    /// Counters never reuse a number within a document even if the
    /// detection is later disabled.
    pub fn assign(&mut self, category: Category, raw_value: &str) -> String {
        let key = (category, normalize(category, raw_value));
        if let Some(token) = self.tokens.get(&key) {
            return token.clone();
        }
        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        let token = format!("<{}_{}>", category.placeholder_stem(), counter);
        self.tokens.insert(key, token.clone());
        token
    }

    pub fn distinct_values(&self, category: Category) -> usize {
        self.counters.get(&category).copied().unwrap_or(0)
    }
}

/// Collapses superficially different renderings of the same value so
/// they share one placeholder: `(415) 555-0100` and `415-555-0100`
/// are the same phone number.
pub fn normalize(category: Category, raw: &str) -> String {
    match category {
        Category::Phone | Category::Ssn | Category::NationalId | Category::CreditCard => {
            raw.chars().filter(|c| c.is_ascii_digit()).collect()
        }
        Category::Iban => raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase(),
        Category::Email | Category::Url => raw.trim().to_lowercase(),
        Category::ImageLogo => raw.trim().to_lowercase(),
        Category::Person | Category::Organization | Category::FinancialAmount => raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
        Category::IpAddress => raw.trim().to_string(),
    }
}
