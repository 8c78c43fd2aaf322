//! Identity reconciliation between a candidate node and a node list.
//!
//! Hash evidence decides first: a node matches when it shares at least one
//! digest with the candidate and agrees on every algorithm both carry. The
//! candidate's package URL is only consulted when hashes find nothing or
//! find too much.
//!
//! ```ignore
//! match nodelist.get_matching_node(&incoming)? {
//!     Some(existing) => merge_into(existing, &incoming),
//!     None => nodelist.add_node(incoming),
//! }
//! ```
//!
//! Ambiguity is an error ([`SbomGraphError::Matching`]); the caller decides
//! whether to skip, merge everything or ask.

mod purl;

pub use purl::{purl_has_type, purl_type, strip_qualifiers};

use crate::error::{Result, SbomGraphError};
use crate::model::{Node, NodeList};
use std::collections::HashSet;
use tracing::debug;

impl NodeList {
    /// Find the node in this list that represents the same artifact as
    /// `candidate`.
    ///
    /// Returns `Ok(None)` when there is no evidence for any node.
    ///
    /// # Errors
    ///
    /// Returns a `MoreThanOneMatch` matching error when the hash and purl
    /// evidence cannot single out one node.
    pub fn get_matching_node(&self, candidate: &Node) -> Result<Option<&Node>> {
        let index = self.index();

        let mut hash_matches: Vec<&Node> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (algorithm, digest) in &candidate.hashes {
            for &node in index.nodes_by_hash(*algorithm, digest) {
                if seen.insert(node.id.as_str()) && node.hashes_match(&candidate.hashes) {
                    hash_matches.push(node);
                }
            }
        }

        let purl = candidate.purl();

        match hash_matches.len() {
            1 => Ok(Some(hash_matches[0])),
            0 => {
                let Some(purl) = purl else {
                    return Ok(None);
                };
                match index.nodes_by_purl(purl) {
                    [] => Ok(None),
                    [node] => Ok(Some(*node)),
                    many => {
                        debug!(purl, candidates = many.len(), "purl matches more than one node");
                        Err(SbomGraphError::more_than_one_match(many.len()))
                    }
                }
            }
            count => {
                let Some(purl) = purl else {
                    debug!(candidates = count, "hashes match more than one node and there is no purl");
                    return Err(SbomGraphError::more_than_one_match(count));
                };
                let by_purl: Vec<&Node> = hash_matches
                    .into_iter()
                    .filter(|node| node.purl() == Some(purl))
                    .collect();
                if let [node] = by_purl.as_slice() {
                    Ok(Some(*node))
                } else {
                    debug!(purl, candidates = count, "purl does not break the hash tie");
                    Err(SbomGraphError::more_than_one_match(count))
                }
            }
        }
    }
}
