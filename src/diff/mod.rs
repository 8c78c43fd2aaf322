//! Structural diff of nodes and node lists.
//!
//! Two levels:
//!
//! - [`Node::diff`](crate::model::Node::diff) compares two versions of one
//!   node field by field and returns a [`NodeDiff`] with partial `added` and
//!   `removed` nodes.
//! - [`NodeList::diff`](crate::model::NodeList::diff) runs three sorted-merge
//!   passes (nodes by id, edges by canonical string, root elements as sets)
//!   and returns a [`NodeListDiff`].
//!
//! Diffs never fail. Identical inputs produce an empty result.
//!
//! # Example
//!
//! ```ignore
//! let diff = before.diff(&after);
//! for node in &diff.nodes.added {
//!     println!("new: {}", node.id);
//! }
//! let patch = diff.added_node_list();
//! ```

mod node;
mod node_list;

pub use node::NodeDiff;
pub use node_list::{ChangeSet, NodeChanges, NodeListDiff};
