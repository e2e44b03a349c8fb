use std::collections::HashMap;

use docveil_core::{DetectConfig, Engine, NodeMap};
use proptest::prelude::*;

proptest! {
    /// Accepted detections are pairwise non-overlapping, offset-sorted
    /// and in bounds for arbitrary input.
    #[test]
    fn detections_never_overlap(text in text_strategy()) {
        let engine = Engine::new();
        let report = engine.detect(&text, &DetectConfig::default());
        let mut last_end = 0usize;
        for d in &report.detections {
            prop_assert!(d.start < d.end);
            prop_assert!(d.end <= text.len());
            prop_assert!(d.start >= last_end);
            prop_assert!(text.is_char_boundary(d.start) && text.is_char_boundary(d.end));
            prop_assert_eq!(&text[d.start..d.end], d.matched_text.as_str());
            last_end = d.end;
        }
    }

    /// Running detection twice over the same input and configuration
    /// yields byte-identical reports.
    #[test]
    fn detection_is_deterministic(text in text_strategy()) {
        let engine = Engine::new();
        let config = DetectConfig::default();
        let a = serde_json::to_string(&engine.detect(&text, &config)).unwrap();
        let b = serde_json::to_string(&engine.detect(&text, &config)).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Placeholders follow the `<CATEGORY_n>` contract, numbering per
    /// category in first-seen order without gaps, and identical
    /// normalized values share one token.
    #[test]
    fn placeholders_are_stable_and_dense(text in text_strategy()) {
        let engine = Engine::new();
        let report = engine.detect(&text, &DetectConfig::default());
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for d in &report.detections {
            let stem = d.category.placeholder_stem();
            let prefix = format!("<{stem}_");
            prop_assert!(d.placeholder.starts_with(&prefix), "bad token {}", d.placeholder);
            prop_assert!(d.placeholder.ends_with('>'));
            let n: usize = d.placeholder[prefix.len()..d.placeholder.len() - 1]
                .parse()
                .unwrap();
            let highest = seen.entry(stem).or_insert(0);
            // Either a reuse of an existing number or the next one.
            prop_assert!(n <= *highest + 1, "non-dense numbering {}", d.placeholder);
            *highest = (*highest).max(n);
        }
    }

    /// Flattening the redacted node map always equals the sanitized
    /// text, for any paragraph split of the buffer.
    #[test]
    fn redaction_round_trips_through_node_map(text in text_strategy(), cut in 0usize..40) {
        let engine = Engine::new();
        let report = engine.detect(&text, &DetectConfig::default());
        let nodes = split_at(&text, cut);
        let outcome = engine.redact(&nodes, &report, &HashMap::new()).unwrap();
        prop_assert_eq!(outcome.nodes.flatten(), outcome.sanitized_text);
    }
}

fn text_strategy() -> impl Strategy<Value = String> {
    // Prose fragments mixed with sensitive-looking tokens, joined in
    // random order, so raw matches overlap in interesting ways.
    let fragment = prop_oneof![
        Just("call me".to_string()),
        Just("a@b.example".to_string()),
        Just("bob@example.com".to_string()),
        Just("+966 50 123 4567".to_string()),
        Just("0501234567".to_string()),
        Just("4532015112830366".to_string()),
        Just("SA0380000000608010167519".to_string()),
        Just("192.168.0.12".to_string()),
        Just("https://x.example/a".to_string()),
        Just("$1,234.56".to_string()),
        Just("Ahmed Khan".to_string()),
        Just("Acme Widgets Inc.".to_string()),
        Just("536-22-8726".to_string()),
        Just("1000000008".to_string()),
        "[a-z ]{0,12}",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.join(" "))
}

/// Splits the buffer into a two-node map at a char boundary near
/// `cut`, exercising cross-node spans.
fn split_at(text: &str, cut: usize) -> NodeMap {
    let mut idx = cut.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    let mut nodes = NodeMap::single(&text[..idx]);
    nodes.nodes.push(docveil_core::NodeRecord {
        id: "node_0002".to_string(),
        text: text[idx..].to_string(),
        kind: docveil_core::NodeKind::Paragraph,
        meta: serde_json::Value::Null,
    });
    nodes
}
