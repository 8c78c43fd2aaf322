//! Graph traversals over a [`NodeList`](crate::model::NodeList).
//!
//! Traversals are inherent methods on `NodeList`:
//! - [`node_siblings`](crate::model::NodeList::node_siblings): a node and its direct children
//! - [`node_graph`](crate::model::NodeList::node_graph): everything reachable below a node
//! - [`node_descendants`](crate::model::NodeList::node_descendants): a depth-limited walk
//! - [`get_nodes_by_purl_type`](crate::model::NodeList::get_nodes_by_purl_type): an ecosystem slice
//! - [`flatten_tree`](crate::model::NodeList::flatten_tree): nesting for tree-shaped formats
//!
//! Root elements other than the starting node are subgraph boundaries and
//! every walk tracks visited ids, so cycles always terminate.

mod traversal;
mod tree;

pub use tree::{Degradation, TreeFlattening, TreeNode};
