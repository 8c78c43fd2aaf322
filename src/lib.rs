//! **A format-neutral graph representation for Software Bills of Materials (SBOMs).**
//!
//! `sbom-graph` holds SBOM documents as a graph of packages and files joined by
//! typed edges. Documents that come from tree-shaped formats (nested component
//! lists) and from relationship-list formats (flat typed relationships) end up
//! in the same shape, so they can be merged, reconciled, queried, diffed and
//! written back out without losing structure.
//!
//! ## Key Features
//!
//! - **Set Algebra**: [`NodeList::add`], [`NodeList::union`], [`NodeList::intersect`]
//!   and [`NodeList::remove_nodes`], with explicit merge policies (augment vs. update).
//! - **Identity Reconciliation**: [`NodeList::get_matching_node`] finds the node
//!   describing the same artifact, using hashes first and the package URL as tie-breaker.
//! - **Traversal**: siblings, full subgraphs, depth-limited descendants and
//!   ecosystem slices, all cycle-safe.
//! - **Tree Anchoring and Flattening**: [`NodeList::relate_node_list_at_id`] folds
//!   tree-shaped fragments into the graph; [`NodeList::flatten_tree`] nests it back,
//!   reporting anything that could not be represented.
//! - **Structural Diff**: [`Node::diff`] and [`NodeList::diff`].
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Document`], [`NodeList`], [`Node`], [`Edge`] and the value
//!   types. Nodes are owned by an id-keyed collection; edges reference ids.
//! - **[`matching`]**: hash and purl based node matching.
//! - **[`graph`]**: traversals and tree flattening.
//! - **[`diff`]**: node and node list diffs.
//! - **[`format`]**: [`Format`] identifiers and the [`FormatRegistry`] of
//!   serializer/unserializer drivers.
//! - **[`config`]**: [`GraphConfig`] with YAML loading and validation.
//!
//! ## Getting Started
//!
//! ```
//! use sbom_graph::{Edge, EdgeType, Node, NodeList};
//!
//! let mut graph = NodeList::new()
//!     .with_node(Node::new_package("app").with_name("app"))
//!     .with_node(Node::new_package("lib").with_purl("pkg:npm/lib@1.0.0"))
//!     .with_edge(Edge::new("app", EdgeType::DependsOn, ["lib"]))
//!     .with_root("app");
//!
//! let fragment = NodeList::new()
//!     .with_node(Node::new_file("app/main.js"))
//!     .with_root("app/main.js");
//! graph
//!     .relate_node_list_at_id(&fragment, "app", EdgeType::Contains)
//!     .unwrap();
//!
//! let below_app = graph.node_descendants("app", 2);
//! assert_eq!(below_app.len(), 3);
//! ```
//!
//! ### Diffing Two Node Lists
//!
//! ```
//! use sbom_graph::{Node, NodeList};
//!
//! let before: NodeList = [Node::new_package("n1").with_name("A")].into_iter().collect();
//! let after: NodeList = [
//!     Node::new_package("n1").with_name("B"),
//!     Node::new_package("n2"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let diff = before.diff(&after);
//! assert_eq!(diff.nodes.added.len(), 1);
//! assert_eq!(diff.nodes.node_diff[0].added.name, "B");
//! ```
//!
//! ## Logging
//!
//! The library logs through [`tracing`] and never installs a subscriber.
//! Graph repairs are logged at `debug`, lossy tree flattening and unreadable
//! config files at `warn`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod graph;
pub mod matching;
pub mod model;

// Re-export main types for convenience
pub use config::{ConfigError, Validatable};
pub use config::{DiffConfig, GraphConfig, GraphConfigBuilder, IdentifierConfig, TraversalConfig};
pub use diff::{ChangeSet, NodeChanges, NodeDiff, NodeListDiff};
pub use error::{ErrorContext, OptionContext, Result, SbomGraphError};
pub use format::{Format, FormatRegistry, NativeJson, Serializer, Unserializer};
pub use graph::{Degradation, TreeFlattening, TreeNode};
pub use model::{
    Document, Edge, EdgeType, ExternalReference, ExternalReferenceType, HashAlgorithm, Metadata,
    Node, NodeIdGenerator, NodeList, NodeListIndex, NodeType, Person, Property, Purpose,
    SoftwareIdentifierType,
};
