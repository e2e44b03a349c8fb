//! Structure-preserving rewrite: substitutes placeholder text for
//! enabled detections node-by-node, leaving node identity, kind and
//! decoder metadata untouched so the format encoder can re-serialize
//! structure unchanged.

use tracing::debug;

use crate::detection::AcceptedDetection;
use crate::error::{Result, VeilError};
use crate::node_map::{NodeMap, NodeRecord};

#[derive(Debug, Clone)]
pub struct RedactionOutcome {
    pub nodes: NodeMap,
    pub sanitized_text: String,
}

/// Applies the enabled detections to the node map. Detections must be
/// the resolver's output: offset-sorted and pairwise non-overlapping.
/// A span crossing a node boundary puts the placeholder in the node
/// where it starts and deletes the covered portion from later nodes.
pub fn apply(
    nodes: &NodeMap,
    text: &str,
    detections: &[AcceptedDetection],
) -> Result<RedactionOutcome> {
    nodes.validate_against(text)?;

    let enabled: Vec<&AcceptedDetection> =
        detections.iter().filter(|d| d.enabled).collect();
    debug!(
        enabled = enabled.len(),
        skipped = detections.len() - enabled.len(),
        "applying redactions"
    );

    // The flat sanitized view comes straight from the canonical buffer.
    let mut sanitized_text = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for detection in &enabled {
        if detection.start < cursor || detection.end > text.len() {
            return Err(VeilError::InvalidDocument(
                "detections must be sorted and non-overlapping",
            ));
        }
        sanitized_text.push_str(&text[cursor..detection.start]);
        sanitized_text.push_str(&detection.placeholder);
        cursor = detection.end;
    }
    sanitized_text.push_str(&text[cursor..]);

    // Per-node rewrite, right-to-left so earlier edits keep their offsets.
    let spans = nodes.spans();
    let mut out_nodes = Vec::with_capacity(nodes.nodes.len());
    for (node, (node_start, node_end)) in nodes.nodes.iter().zip(spans) {
        let mut edits: Vec<(usize, usize, &str)> = Vec::new();
        for detection in &enabled {
            if detection.start >= node_end || detection.end <= node_start {
                continue;
            }
            let local_start = detection.start.max(node_start) - node_start;
            let local_end = detection.end.min(node_end) - node_start;
            // Placeholder lands where the span starts; continuation
            // nodes only lose the covered portion.
            let replacement = if detection.start >= node_start {
                detection.placeholder.as_str()
            } else {
                ""
            };
            edits.push((local_start, local_end, replacement));
        }
        let mut new_text = node.text.clone();
        for (local_start, local_end, replacement) in edits.into_iter().rev() {
            new_text.replace_range(local_start..local_end, replacement);
        }
        out_nodes.push(NodeRecord {
            id: node.id.clone(),
            text: new_text,
            kind: node.kind,
            meta: node.meta.clone(),
        });
    }
    let out = NodeMap { nodes: out_nodes };

    // Invariant check: re-flattening the mutated map must equal the
    // flat sanitized view exactly. Fail the document loudly rather
    // than corrupt output silently.
    if out.flatten() != sanitized_text {
        return Err(VeilError::StructureMismatch(
            "mutated node map does not reconcile with sanitized text",
        ));
    }

    Ok(RedactionOutcome {
        nodes: out,
        sanitized_text,
    })
}
