//! Documents: metadata plus exactly one node list.

use super::{Metadata, Node, NodeList};
use serde::{Deserialize, Serialize};

/// An SBOM in the neutral representation.
///
/// Translation pipelines replace documents wholesale rather than patching
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub node_list: NodeList,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document around an existing node list
    pub fn with_node_list(metadata: Metadata, node_list: NodeList) -> Self {
        Self {
            metadata,
            node_list,
        }
    }

    /// Top level nodes of the document
    #[must_use]
    pub fn get_root_nodes(&self) -> Vec<&Node> {
        self.node_list.get_root_nodes()
    }
}
