mod applier;
mod decoder;
mod detection;
mod detectors;
mod encoder;
mod engine;
mod error;
mod imagehash;
mod node_map;
mod ocr;
mod placeholder;
mod resolver;

pub use applier::RedactionOutcome;
pub use decoder::{DecodedDocument, EmbeddedImage, FormatDecoder, PlainTextDecoder};
pub use detection::{AcceptedDetection, Category, Detection, DetectionReport, LogoFinding};
pub use detectors::{iban_checksum_ok, luhn_valid, Detector};
pub use encoder::{FormatEncoder, PlainTextEncoder};
pub use engine::{DetectConfig, Engine};
pub use error::{Result, VeilError};
pub use imagehash::{
    distance, similarity, FingerprintCache, ImageCodec, ImageFingerprint, ImageMatch,
    DEFAULT_THRESHOLD, HASH_BITS,
};
pub use node_map::{NodeKind, NodeMap, NodeRecord};
pub use ocr::{OcrEngine, OcrOutput, OcrWord};
pub use placeholder::{normalize, PlaceholderMap};
pub use resolver::Precedence;
