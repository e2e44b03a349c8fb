//! The engine facade: one `detect` / `redact` request-response surface
//! over the detector set, resolver, allocator and applier, plus the
//! perceptual image entry points. All state (placeholder counters,
//! fingerprint cache) is scoped to one engine instance and discarded
//! with it; independent documents can use independent engines in
//! parallel.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use tracing::debug;

use crate::applier::{self, RedactionOutcome};
use crate::decoder::{DecodedDocument, EmbeddedImage};
use crate::detection::{
    AcceptedDetection, Category, Detection, DetectionReport, LogoFinding,
};
use crate::detectors;
use crate::error::{Result, VeilError};
use crate::imagehash::{
    self, FingerprintCache, ImageCodec, ImageFingerprint, ImageMatch, DEFAULT_THRESHOLD,
};
use crate::node_map::NodeMap;
use crate::placeholder::PlaceholderMap;
use crate::resolver::{self, Precedence};

#[derive(Debug, Clone)]
pub struct DetectConfig {
    pub enabled_categories: BTreeSet<Category>,
    pub custom_names: Vec<String>,
    pub custom_organizations: Vec<String>,
    pub min_confidence: f32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            enabled_categories: Category::all().iter().copied().collect(),
            custom_names: Vec::new(),
            custom_organizations: Vec::new(),
            // Low enough that Luhn-failing card candidates still show
            // up in the report for the operator to judge.
            min_confidence: 0.3,
        }
    }
}

pub struct Engine {
    precedence: Precedence,
    codec: Box<dyn ImageCodec>,
    fingerprints: Mutex<FingerprintCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            precedence: Precedence::default(),
            codec: Box::new(imagehash::DefaultCodec),
            fingerprints: Mutex::new(FingerprintCache::new()),
        }
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_codec(mut self, codec: Box<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Runs the full text pipeline: detectors, resolver, placeholder
    /// allocation. Deterministic: identical input and configuration
    /// yield byte-identical reports.
    pub fn detect(&self, text: &str, config: &DetectConfig) -> DetectionReport {
        let detectors = detectors::registry(config);
        let mut raw = detectors::run_all(&detectors, text);
        raw.retain(|d| d.confidence >= config.min_confidence);
        debug!(raw = raw.len(), "raw detections gathered");

        let resolved = resolver::resolve(raw, &self.precedence);
        let mut placeholders = PlaceholderMap::new();
        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        let detections: Vec<AcceptedDetection> = resolved
            .into_iter()
            .enumerate()
            .map(|(id, d)| {
                *counts.entry(d.category).or_insert(0) += 1;
                let placeholder = placeholders.assign(d.category, &d.matched_text);
                promote(id, d, placeholder)
            })
            .collect();

        DetectionReport {
            detections,
            logos: Vec::new(),
            counts,
            text_len: text.len(),
        }
    }

    /// Detection over a decoded document: text pipeline plus logo
    /// matching of the embedded images against reference fingerprints,
    /// merged into one report.
    pub fn detect_document(
        &self,
        document: &DecodedDocument,
        config: &DetectConfig,
        logo_references: &[ImageFingerprint],
        threshold: f64,
    ) -> DetectionReport {
        let mut report = self.detect(&document.text, config);
        if !config.enabled_categories.contains(&Category::ImageLogo) {
            return report;
        }
        let mut placeholders = PlaceholderMap::new();
        for image in &document.images {
            if let Some(finding) =
                self.match_logo(image, logo_references, threshold, &mut placeholders)
            {
                *report.counts.entry(Category::ImageLogo).or_insert(0) += 1;
                report.logos.push(finding);
            }
        }
        report
    }

    fn match_logo(
        &self,
        image: &EmbeddedImage,
        references: &[ImageFingerprint],
        threshold: f64,
        placeholders: &mut PlaceholderMap,
    ) -> Option<LogoFinding> {
        let fp = self.fingerprint_image(&image.bytes)?;
        let best = references
            .iter()
            .map(|r| imagehash::similarity(&fp.hash, &r.hash))
            .fold(0.0f64, f64::max);
        if best < threshold {
            return None;
        }
        let placeholder = placeholders.assign(Category::ImageLogo, &fp.hash);
        Some(LogoFinding {
            image_id: image.id.clone(),
            fingerprint: fp.hash,
            similarity: best,
            enabled: true,
            placeholder,
        })
    }

    /// Applies a report back onto the structured document. `overrides`
    /// flips `enabled` per detection id; everything else in the report
    /// is taken as-is.
    pub fn redact(
        &self,
        nodes: &NodeMap,
        report: &DetectionReport,
        overrides: &HashMap<usize, bool>,
    ) -> Result<RedactionOutcome> {
        let text = nodes.flatten();
        if text.len() != report.text_len {
            return Err(VeilError::InvalidDocument(
                "detection report was produced for a different text buffer",
            ));
        }
        let mut detections = report.detections.clone();
        for detection in &mut detections {
            if let Some(enabled) = overrides.get(&detection.id) {
                detection.enabled = *enabled;
            }
        }
        applier::apply(nodes, &text, &detections)
    }

    /// `None` means the codec is unavailable or the bytes are
    /// malformed; callers must treat that as "cannot compare".
    pub fn fingerprint_image(&self, bytes: &[u8]) -> Option<ImageFingerprint> {
        let mut cache = match self.fingerprints.lock() {
            Ok(guard) => guard,
            // The cache holds only derived values; a poisoned lock is
            // safe to reuse.
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.fingerprint(self.codec.as_ref(), bytes)
    }

    /// For callers that require a fingerprint, e.g. when registering a
    /// reference logo, and cannot proceed without one.
    pub fn try_fingerprint_image(&self, bytes: &[u8]) -> Result<ImageFingerprint> {
        self.fingerprint_image(bytes)
            .ok_or(VeilError::FingerprintUnavailable)
    }

    pub fn compare_images(&self, a: &[u8], b: &[u8], threshold: f64) -> ImageMatch {
        let (Some(fa), Some(fb)) = (self.fingerprint_image(a), self.fingerprint_image(b))
        else {
            return ImageMatch::unavailable();
        };
        imagehash::matches(&fa, &fb, threshold)
    }

    pub fn compare_to_fingerprint(
        &self,
        bytes: &[u8],
        reference: &ImageFingerprint,
        threshold: f64,
    ) -> ImageMatch {
        let Some(fp) = self.fingerprint_image(bytes) else {
            return ImageMatch::unavailable();
        };
        imagehash::matches(&fp, reference, threshold)
    }

    pub fn default_logo_threshold() -> f64 {
        DEFAULT_THRESHOLD
    }
}

fn promote(id: usize, d: Detection, placeholder: String) -> AcceptedDetection {
    AcceptedDetection {
        id,
        category: d.category,
        start: d.start,
        end: d.end,
        matched_text: d.matched_text,
        confidence: d.confidence,
        source: d.source,
        enabled: true,
        placeholder,
    }
}
