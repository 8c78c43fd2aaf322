//! Default values shared by the configuration types.

use crate::model::EdgeType;

/// Edge types treated as nesting when flattening a graph into a tree
pub const DEFAULT_TREE_EDGE_TYPES: &[EdgeType] = &[EdgeType::Contains];

/// `node_descendants` depth per tree level: the node plus its children
pub const DEFAULT_DESCENDANT_DEPTH: usize = 2;

/// Smallest depth that still reaches a node's children
pub const MIN_DESCENDANT_DEPTH: usize = 2;
