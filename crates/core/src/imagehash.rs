//! Perceptual image matching: a 64-bit average hash compared by
//! Hamming distance, used to flag recurring logos and letterhead
//! images as redaction candidates. Degrades gracefully: without an
//! image codec every entry point reports "cannot compare" rather than
//! failing the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const HASH_BITS: u32 = 64;
pub const DEFAULT_THRESHOLD: f64 = 85.0;

/// 64-bit average hash encoded as 16 lowercase hex characters, plus
/// the source dimensions at hash time. Computed on demand and cached
/// for one session only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFingerprint {
    pub hash: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMatch {
    pub is_match: bool,
    pub similarity: f64,
}

impl ImageMatch {
    /// The "cannot compare" result: callers exclude the image from
    /// logo-based redaction, they do not treat it as a proven
    /// non-logo.
    pub fn unavailable() -> Self {
        Self {
            is_match: false,
            similarity: 0.0,
        }
    }
}

/// Capability-checked access to the underlying image codec. All
/// matcher entry points query `available()` first instead of branching
/// on a nullable native handle.
pub trait ImageCodec: Send + Sync {
    fn available(&self) -> bool;

    /// Decodes and downsamples to an 8x8 grayscale grid, returning the
    /// 64 samples plus the source dimensions. `None` for malformed
    /// bytes or when the codec is unavailable.
    fn luma_grid(&self, bytes: &[u8]) -> Option<([u8; 64], u32, u32)>;
}

#[derive(Debug, Default)]
pub struct DefaultCodec;

#[cfg(feature = "codecs")]
impl ImageCodec for DefaultCodec {
    fn available(&self) -> bool {
        true
    }

    fn luma_grid(&self, bytes: &[u8]) -> Option<([u8; 64], u32, u32)> {
        use image::imageops::FilterType;
        let decoded = image::load_from_memory(bytes).ok()?;
        let (width, height) = (decoded.width(), decoded.height());
        let small = decoded
            .resize_exact(8, 8, FilterType::Triangle)
            .to_luma8();
        let mut samples = [0u8; 64];
        samples.copy_from_slice(small.as_raw());
        Some((samples, width, height))
    }
}

#[cfg(not(feature = "codecs"))]
impl ImageCodec for DefaultCodec {
    fn available(&self) -> bool {
        false
    }

    fn luma_grid(&self, _bytes: &[u8]) -> Option<([u8; 64], u32, u32)> {
        None
    }
}

/// Computes the average-hash fingerprint: bit *i* is 1 iff sample *i*
/// exceeds the mean of the 64 samples. `None` means unavailable, not
/// "not a logo".
pub fn fingerprint(codec: &dyn ImageCodec, bytes: &[u8]) -> Option<ImageFingerprint> {
    if !codec.available() {
        warn!("image codec unavailable; skipping fingerprint");
        return None;
    }
    let (samples, width, height) = codec.luma_grid(bytes)?;
    let mean = samples.iter().map(|s| *s as u32).sum::<u32>() as f64 / 64.0;
    let mut bits = 0u64;
    for (i, sample) in samples.iter().enumerate() {
        if *sample as f64 > mean {
            bits |= 1 << (63 - i);
        }
    }
    Some(ImageFingerprint {
        hash: hex::encode(bits.to_be_bytes()),
        width,
        height,
    })
}

/// Hamming distance between two encoded fingerprints. Anything that is
/// not a full 16-hex-char encoding is maximally dissimilar rather than
/// compared bit-by-bit; a short pair must not have its distance scaled
/// up over the 64-bit range.
pub fn distance(a: &str, b: &str) -> u32 {
    let hex_len = (HASH_BITS / 4) as usize;
    if a.len() != hex_len || b.len() != hex_len {
        return HASH_BITS;
    }
    match (u64::from_str_radix(a, 16), u64::from_str_radix(b, 16)) {
        (Ok(x), Ok(y)) => (x ^ y).count_ones(),
        _ => HASH_BITS,
    }
}

/// `100 * (64 - distance) / 64`, rounded to two decimal places.
pub fn similarity(a: &str, b: &str) -> f64 {
    let d = distance(a, b);
    let pct = 100.0 * (HASH_BITS - d) as f64 / HASH_BITS as f64;
    (pct * 100.0).round() / 100.0
}

pub fn matches(a: &ImageFingerprint, b: &ImageFingerprint, threshold: f64) -> ImageMatch {
    let similarity = similarity(&a.hash, &b.hash);
    ImageMatch {
        is_match: similarity >= threshold,
        similarity,
    }
}

/// Session-scoped fingerprint cache keyed by image identity (blake3 of
/// the bytes). Negative results are cached too, so a malformed image
/// is only decoded once.
#[derive(Debug, Default)]
pub struct FingerprintCache {
    entries: HashMap<[u8; 32], Option<ImageFingerprint>>,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(
        &mut self,
        codec: &dyn ImageCodec,
        bytes: &[u8],
    ) -> Option<ImageFingerprint> {
        let key = *blake3::hash(bytes).as_bytes();
        self.entries
            .entry(key)
            .or_insert_with(|| fingerprint(codec, bytes))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
