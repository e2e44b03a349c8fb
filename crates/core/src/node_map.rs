//! The decoder-owned structured representation linking text offsets
//! back to document structure. Invariant: concatenating the node text
//! runs in order reproduces the canonical buffer fed to the detectors
//! exactly.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VeilError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Paragraph,
    TableCell,
    SlideText,
    PageRegion,
    Other,
}

/// One text-bearing node. `meta` carries whatever structure the format
/// decoder needs to re-serialize (styling markers, cell coordinates,
/// page position); the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub text: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeMap {
    pub nodes: Vec<NodeRecord>,
}

impl NodeMap {
    /// Single paragraph node covering the whole buffer; the shape the
    /// plain-text decoder produces for unstructured input.
    pub fn single(text: &str) -> Self {
        Self {
            nodes: vec![NodeRecord {
                id: "node_0001".to_string(),
                text: text.to_string(),
                kind: NodeKind::Paragraph,
                meta: serde_json::Value::Null,
            }],
        }
    }

    pub fn flatten(&self) -> String {
        let mut out = String::with_capacity(self.nodes.iter().map(|n| n.text.len()).sum());
        for node in &self.nodes {
            out.push_str(&node.text);
        }
        out
    }

    /// Global `[start, end)` byte range of each node within the
    /// flattened buffer, in node order.
    pub fn spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::with_capacity(self.nodes.len());
        let mut offset = 0usize;
        for node in &self.nodes {
            let end = offset + node.text.len();
            spans.push((offset, end));
            offset = end;
        }
        spans
    }

    pub fn validate_against(&self, text: &str) -> Result<()> {
        if self.flatten() != text {
            return Err(VeilError::InvalidDocument(
                "node map does not reproduce the canonical text buffer",
            ));
        }
        Ok(())
    }
}
