//! Optical character recognition is an external collaborator. Its
//! output text feeds into `Engine::detect` identically to native
//! text; the engine never invokes OCR itself and never blocks on it.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: f32,
    pub words: Vec<OcrWord>,
}

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8], language: &str) -> Result<OcrOutput>;
}
