//! Lookup indices over a [`NodeList`].
//!
//! Indices are ephemeral: they borrow the node list they were built from and
//! are rebuilt whenever a query needs them. Nothing here is persisted.
//!
//! ```ignore
//! let index = nodelist.index();
//!
//! // Every node carrying this exact digest
//! let same_blob = index.nodes_by_hash(HashAlgorithm::Sha256, "9f86d0...");
//! ```

use super::{EdgeType, HashAlgorithm, Node, NodeList};
use std::collections::{HashMap, HashSet};

/// Precomputed lookups for a node list.
///
/// Built in O(n + m) where n = nodes and m = edges.
#[derive(Debug, Clone)]
#[must_use]
pub struct NodeListIndex<'a> {
    /// Nodes by id
    by_id: HashMap<&'a str, &'a Node>,
    /// Edge positions by (from, type)
    edges_by_source: HashMap<(&'a str, EdgeType), Vec<usize>>,
    /// Edge positions by from, in edge order
    edges_by_from: HashMap<&'a str, Vec<usize>>,
    /// Root element ids
    roots: HashSet<&'a str>,
    /// Nodes by `ALGORITHM:digest`; a digest may be shared by several nodes
    by_hash: HashMap<String, Vec<&'a Node>>,
    /// Nodes by package URL
    by_purl: HashMap<&'a str, Vec<&'a Node>>,
}

impl<'a> NodeListIndex<'a> {
    /// Build every index for `nodelist`.
    pub fn build(nodelist: &'a NodeList) -> Self {
        let mut by_id = HashMap::with_capacity(nodelist.len());
        let mut by_hash: HashMap<String, Vec<&'a Node>> = HashMap::new();
        let mut by_purl: HashMap<&'a str, Vec<&'a Node>> = HashMap::new();

        for node in nodelist.nodes() {
            by_id.insert(node.id.as_str(), node);
            for (algo, digest) in &node.hashes {
                by_hash.entry(hash_key(*algo, digest)).or_default().push(node);
            }
            if let Some(purl) = node.purl() {
                by_purl.entry(purl).or_default().push(node);
            }
        }

        let mut edges_by_source: HashMap<(&'a str, EdgeType), Vec<usize>> = HashMap::new();
        let mut edges_by_from: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, edge) in nodelist.edges.iter().enumerate() {
            edges_by_source
                .entry((edge.from.as_str(), edge.edge_type))
                .or_default()
                .push(idx);
            edges_by_from.entry(edge.from.as_str()).or_default().push(idx);
        }

        let roots = nodelist.root_elements.iter().map(String::as_str).collect();

        Self {
            by_id,
            edges_by_source,
            edges_by_from,
            roots,
            by_hash,
            by_purl,
        }
    }

    /// Node with the given id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).copied()
    }

    /// True if `id` is a node of the list
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Positions in `nodelist.edges` of edges leaving `from` with `edge_type`
    #[must_use]
    pub fn edges_from<'s>(&'s self, from: &'s str, edge_type: EdgeType) -> &'s [usize] {
        self.edges_by_source
            .get(&(from, edge_type))
            .map_or(&[], Vec::as_slice)
    }

    /// Positions in `nodelist.edges` of every edge leaving `from`, ascending
    #[must_use]
    pub fn edges_leaving(&self, from: &str) -> &[usize] {
        self.edges_by_from.get(from).map_or(&[], Vec::as_slice)
    }

    /// True if `id` is listed as a root element
    #[must_use]
    pub fn is_root(&self, id: &str) -> bool {
        self.roots.contains(id)
    }

    /// Nodes carrying `digest` for `algorithm`
    #[must_use]
    pub fn nodes_by_hash(&self, algorithm: HashAlgorithm, digest: &str) -> &[&'a Node] {
        self.by_hash
            .get(&hash_key(algorithm, digest))
            .map_or(&[], Vec::as_slice)
    }

    /// Nodes whose derived package URL is `purl`
    #[must_use]
    pub fn nodes_by_purl(&self, purl: &str) -> &[&'a Node] {
        self.by_purl.get(purl).map_or(&[], Vec::as_slice)
    }

    /// Number of indexed nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of distinct `ALGORITHM:digest` keys
    #[must_use]
    pub fn hash_key_count(&self) -> usize {
        self.by_hash.len()
    }

    /// Number of distinct package URLs
    #[must_use]
    pub fn purl_count(&self) -> usize {
        self.by_purl.len()
    }
}

/// Key used by the hash index
#[must_use]
pub fn hash_key(algorithm: HashAlgorithm, digest: &str) -> String {
    format!("{algorithm}:{digest}")
}
