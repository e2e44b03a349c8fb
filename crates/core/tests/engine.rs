use std::collections::HashMap;

use docveil_core::{
    Category, DetectConfig, Engine, FormatDecoder, NodeMap, PlainTextDecoder,
};

#[test]
fn two_emails_redact_to_numbered_placeholders() {
    let text = "Contact test@example.com or bob@example.com";
    let engine = Engine::new();
    let report = engine.detect(text, &DetectConfig::default());
    let nodes = NodeMap::single(text);
    let outcome = engine.redact(&nodes, &report, &HashMap::new()).unwrap();
    assert_eq!(outcome.sanitized_text, "Contact <EMAIL_1> or <EMAIL_2>");
    assert_eq!(outcome.nodes.flatten(), outcome.sanitized_text);
}

#[test]
fn disabling_one_detection_leaves_its_substring_verbatim() {
    let text = "Contact test@example.com or bob@example.com";
    let engine = Engine::new();
    let report = engine.detect(text, &DetectConfig::default());
    let first_email_id = report
        .detections
        .iter()
        .find(|d| d.matched_text == "test@example.com")
        .unwrap()
        .id;
    let overrides = HashMap::from([(first_email_id, false)]);
    let nodes = NodeMap::single(text);
    let outcome = engine.redact(&nodes, &report, &overrides).unwrap();
    assert_eq!(
        outcome.sanitized_text,
        "Contact test@example.com or <EMAIL_2>"
    );
    // The disabled detection stays in the report.
    assert_eq!(report.detections.len(), 2);
}

#[test]
fn redaction_preserves_multi_node_structure() {
    let raw = b"Dear team,\n\nSSN 536-22-8726 was exposed.\n\nwire SA0380000000608010167519\n";
    let doc = PlainTextDecoder.decode(raw, None).unwrap();
    let engine = Engine::new();
    let report = engine.detect(&doc.text, &DetectConfig::default());
    let outcome = engine.redact(&doc.nodes, &report, &HashMap::new()).unwrap();
    assert_eq!(outcome.nodes.nodes.len(), doc.nodes.nodes.len());
    for (before, after) in doc.nodes.nodes.iter().zip(&outcome.nodes.nodes) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.kind, after.kind);
    }
    assert!(outcome.sanitized_text.contains("<SSN_1>"));
    assert!(outcome.sanitized_text.contains("<IBAN_1>"));
    assert!(!outcome.sanitized_text.contains("536-22-8726"));
    assert_eq!(outcome.nodes.flatten(), outcome.sanitized_text);
}

#[test]
fn luhn_valid_card_scores_high_and_invalid_scores_low() {
    let engine = Engine::new();
    let report = engine.detect(
        "cards 4532015112830366 and 1234567890123456 differ",
        &DetectConfig::default(),
    );
    let cards: Vec<_> = report
        .detections
        .iter()
        .filter(|d| d.category == Category::CreditCard)
        .collect();
    assert_eq!(cards.len(), 2);
    assert!(cards[0].confidence >= 0.9);
    assert!(cards[1].confidence <= 0.5);
    assert!(cards[1].confidence > 0.0, "failing Luhn is reported, not dropped");
}

#[test]
fn detection_is_deterministic_across_runs() {
    let text = "Ahmed Khan <ahmed@corp.example> paid $1,250.00 from \
                SA0380000000608010167519, call +966 50 123 4567 or see \
                https://portal.example/invoices";
    let engine = Engine::new();
    let config = DetectConfig::default();
    let a = serde_json::to_string(&engine.detect(text, &config)).unwrap();
    let b = serde_json::to_string(&engine.detect(text, &config)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn accepted_detections_never_overlap() {
    let text = "email admin@10.0.0.1.example.com at https://x.example/a?mail=a@b.example \
                or 0501234567 / +966501234567, id 1000000008, card 4532 0151 1283 0366";
    let engine = Engine::new();
    let report = engine.detect(text, &DetectConfig::default());
    let mut last_end = 0usize;
    for d in &report.detections {
        assert!(d.start >= last_end, "overlap at {}..{}", d.start, d.end);
        assert!(d.end <= text.len());
        last_end = d.end;
    }
}

#[test]
fn custom_names_bypass_the_heuristic() {
    let text = "approved by al-rashid trading per policy";
    let engine = Engine::new();
    let mut config = DetectConfig::default();
    config.custom_organizations = vec!["al-rashid trading".to_string()];
    let report = engine.detect(text, &config);
    let org = report
        .detections
        .iter()
        .find(|d| d.category == Category::Organization)
        .unwrap();
    assert!((org.confidence - 1.0).abs() < f32::EPSILON);
    assert_eq!(org.placeholder, "<ORGANIZATION_1>");
}

#[cfg(feature = "codecs")]
mod image_matching {
    use docveil_core::{
        Category, DecodedDocument, DetectConfig, EmbeddedImage, Engine, ImageCodec, ImageMatch,
        NodeMap, VeilError, DEFAULT_THRESHOLD,
    };
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(pixels: impl Fn(u32, u32) -> u8) -> Vec<u8> {
        let img = RgbImage::from_fn(64, 64, |x, y| {
            let v = pixels(x, y);
            image::Rgb([v, v, v])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn identical_images_match_at_similarity_100() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        let m = engine.compare_images(&logo, &logo, DEFAULT_THRESHOLD);
        assert!(m.is_match);
        assert_eq!(m.similarity, 100.0);
    }

    #[test]
    fn near_duplicate_letterhead_stays_above_threshold() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        // Same logo with a small bright patch in one corner.
        let stamped = png(|x, y| if x < 8 && y < 8 { 255 } else { (x * 4) as u8 });
        let m = engine.compare_images(&logo, &stamped, DEFAULT_THRESHOLD);
        assert!(m.similarity < 100.0);
        assert!(m.is_match, "similarity was {}", m.similarity);
    }

    fn document_with(text: &str, image: Vec<u8>) -> DecodedDocument {
        DecodedDocument {
            text: text.to_string(),
            nodes: NodeMap::single(text),
            images: vec![EmbeddedImage {
                id: "img_0001".to_string(),
                bytes: image,
            }],
        }
    }

    #[test]
    fn embedded_logo_match_merges_into_the_report() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        let reference = engine.try_fingerprint_image(&logo).unwrap();
        let document = document_with("mail a@b.example now", logo);
        let report = engine.detect_document(
            &document,
            &DetectConfig::default(),
            &[reference],
            DEFAULT_THRESHOLD,
        );
        assert_eq!(report.logos.len(), 1);
        let finding = &report.logos[0];
        assert_eq!(finding.image_id, "img_0001");
        assert_eq!(finding.placeholder, "<IMAGE_LOGO_1>");
        assert_eq!(finding.similarity, 100.0);
        assert!(finding.enabled);
        assert_eq!(report.counts[&Category::ImageLogo], 1);
        // The text pipeline still ran alongside the image pass.
        assert!(report
            .detections
            .iter()
            .any(|d| d.category == Category::Email));
    }

    #[test]
    fn below_threshold_image_is_not_a_finding() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        // Inverted gradient: nearly every hash bit flips.
        let unrelated = png(|x, _| 255 - (x * 4) as u8);
        let reference = engine.try_fingerprint_image(&logo).unwrap();
        let document = document_with("no text matches here", unrelated);
        let report = engine.detect_document(
            &document,
            &DetectConfig::default(),
            &[reference],
            DEFAULT_THRESHOLD,
        );
        assert!(report.logos.is_empty());
        assert!(!report.counts.contains_key(&Category::ImageLogo));
    }

    #[test]
    fn disabled_image_logo_category_skips_matching() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        let reference = engine.try_fingerprint_image(&logo).unwrap();
        let document = document_with("no text matches here", logo);
        let mut config = DetectConfig::default();
        config.enabled_categories.remove(&Category::ImageLogo);
        let report =
            engine.detect_document(&document, &config, &[reference], DEFAULT_THRESHOLD);
        assert!(report.logos.is_empty());
    }

    #[test]
    fn demanded_fingerprint_without_codec_is_an_error() {
        struct NoCodec;
        impl ImageCodec for NoCodec {
            fn available(&self) -> bool {
                false
            }
            fn luma_grid(&self, _bytes: &[u8]) -> Option<([u8; 64], u32, u32)> {
                None
            }
        }
        let engine = Engine::new().with_codec(Box::new(NoCodec));
        let err = engine.try_fingerprint_image(b"anything").unwrap_err();
        assert!(matches!(err, VeilError::FingerprintUnavailable));
    }

    #[test]
    fn malformed_bytes_cannot_compare() {
        let engine = Engine::new();
        let logo = png(|x, _| (x * 4) as u8);
        let m = engine.compare_images(&logo, b"not an image", DEFAULT_THRESHOLD);
        assert_eq!(m, ImageMatch::unavailable());
    }

    #[test]
    fn unavailable_codec_reports_no_match_instead_of_raising() {
        struct NoCodec;
        impl ImageCodec for NoCodec {
            fn available(&self) -> bool {
                false
            }
            fn luma_grid(&self, _bytes: &[u8]) -> Option<([u8; 64], u32, u32)> {
                None
            }
        }
        let engine = Engine::new().with_codec(Box::new(NoCodec));
        let logo = png(|x, _| (x * 4) as u8);
        let m = engine.compare_images(&logo, &logo, DEFAULT_THRESHOLD);
        assert!(!m.is_match);
        assert_eq!(m.similarity, 0.0);
        assert!(engine.fingerprint_image(&logo).is_none());
    }
}
