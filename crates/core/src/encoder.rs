//! Mirror of the decoder seam: the format encoder re-serializes a
//! (possibly redacted) node map back into file bytes.

use crate::error::Result;
use crate::node_map::NodeMap;

pub trait FormatEncoder: Send + Sync {
    fn encode(&self, nodes: &NodeMap) -> Result<Vec<u8>>;
}

#[derive(Debug, Default)]
pub struct PlainTextEncoder;

impl FormatEncoder for PlainTextEncoder {
    fn encode(&self, nodes: &NodeMap) -> Result<Vec<u8>> {
        Ok(nodes.flatten().into_bytes())
    }
}
