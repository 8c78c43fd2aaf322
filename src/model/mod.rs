//! Format-neutral graph representation of SBOM documents.
//!
//! A [`Document`] holds [`Metadata`] and one [`NodeList`]. The node list owns
//! every [`Node`] in an id-keyed collection; [`Edge`]s reference nodes by id
//! only, so cycles never create ownership problems.
//!
//! # Index Support
//!
//! Hash and purl lookups used by node matching go through
//! [`NodeListIndex`], built on demand:
//!
//! ```ignore
//! let index = nodelist.index();
//! let candidates = index.nodes_by_purl("pkg:npm/left-pad@1.3.0");
//! ```

mod canonical;
mod document;
mod edge;
mod identifiers;
mod index;
mod metadata;
mod node;
mod node_list;

pub use document::*;
pub use edge::*;
pub use identifiers::*;
pub use index::*;
pub use metadata::*;
pub use node::*;
pub use node_list::*;
