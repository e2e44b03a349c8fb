//! Format decoding is an external collaborator: something turns raw
//! file bytes into extracted text plus a node map plus embedded
//! images, and the engine takes it from there. The trait lives here;
//! only the trivial plain-text decoder ships in-tree.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VeilError};
use crate::node_map::{NodeKind, NodeMap, NodeRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub id: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    pub text: String,
    pub nodes: NodeMap,
    pub images: Vec<EmbeddedImage>,
}

pub trait FormatDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], format_hint: Option<&str>) -> Result<DecodedDocument>;
}

/// Paragraph-per-node plain-text decoder. Blank-line separators stay
/// attached to the preceding node so flattening reproduces the buffer
/// exactly.
#[derive(Debug, Default)]
pub struct PlainTextDecoder;

impl FormatDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8], _format_hint: Option<&str>) -> Result<DecodedDocument> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| VeilError::Decode(format!("input is not valid utf-8: {e}")))?
            .to_string();
        let mut nodes = Vec::new();
        let mut start = 0usize;
        let mut counter = 0usize;
        while start < text.len() {
            let end = match text[start..].find("\n\n") {
                Some(pos) => start + pos + 2,
                None => text.len(),
            };
            counter += 1;
            nodes.push(NodeRecord {
                id: format!("node_{counter:04}"),
                text: text[start..end].to_string(),
                kind: NodeKind::Paragraph,
                meta: serde_json::Value::Null,
            });
            start = end;
        }
        Ok(DecodedDocument {
            text,
            nodes: NodeMap { nodes },
            images: Vec::new(),
        })
    }
}
