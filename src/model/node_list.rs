//! The graph container: nodes keyed by id, typed edges and root elements.
//!
//! A `NodeList` is the main work unit of the crate. Unserializers build one by
//! folding small fragments together with [`NodeList::add`] and
//! [`NodeList::relate_node_list_at_id`]; serializers read it back through
//! [`NodeList::get_root_nodes`] and the traversals in [`crate::graph`].
//!
//! Edges reference nodes by id only. Any mutation may leave dangling ids
//! behind; [`NodeList::clean_edges`] is the single routine that repairs them.

use super::{Edge, EdgeType, Node, NodeListIndex, SoftwareIdentifierType};
use crate::error::{Result, SbomGraphError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A graph of nodes, typed edges and root elements.
///
/// Node ids are unique by construction. Edges satisfy "one edge per
/// (from, type), every referenced id exists" only after [`clean_edges`]
/// has run; every set operation in this module ends with it.
///
/// [`clean_edges`]: NodeList::clean_edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(deserialize_with = "deserialize_nodes")]
    pub(crate) nodes: IndexMap<String, Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Entry points of the graph, in insertion order
    #[serde(default)]
    pub root_elements: Vec<String>,
}

/// Read the node map and file every node under its own id.
///
/// Map keys are not trusted: a node stored under a foreign key moves to
/// `node.id`, and a later node with the same id replaces the earlier one.
fn deserialize_nodes<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let keyed = IndexMap::<String, Node>::deserialize(deserializer)?;
    let mut nodes = IndexMap::with_capacity(keyed.len());
    for (key, node) in keyed {
        if key != node.id {
            debug!(key = %key, id = %node.id, "node stored under a foreign key, re-keying");
        }
        if nodes.contains_key(&node.id) {
            debug!(id = %node.id, "duplicate node id, keeping the later node");
        }
        nodes.insert(node.id.clone(), node);
    }
    Ok(nodes)
}

impl NodeList {
    /// Create an empty node list
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder helpers
    // ========================================================================

    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.add_edge(edge);
        self
    }

    #[must_use]
    pub fn with_root(mut self, id: impl Into<String>) -> Self {
        self.add_root_element(id);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Build the lookup indices for this list
    pub fn index(&self) -> NodeListIndex<'_> {
        NodeListIndex::build(self)
    }

    // ========================================================================
    // Mutation primitives
    // ========================================================================

    /// Insert a node, replacing any node with the same id.
    ///
    /// Returns the replaced node, if any. The replacement keeps the original
    /// position.
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Add an edge, merging its destinations into an existing edge with the
    /// same (from, type) when there is one.
    pub fn add_edge(&mut self, edge: Edge) {
        match self
            .edges
            .iter_mut()
            .find(|e| e.from == edge.from && e.edge_type == edge.edge_type)
        {
            Some(existing) => {
                existing.add_destination_by_id(edge.to);
            }
            None => self.edges.push(edge),
        }
    }

    /// Append a root element unless it is already listed.
    pub fn add_root_element(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.root_elements.contains(&id) {
            self.root_elements.push(id);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes whose name is exactly `name`
    #[must_use]
    pub fn get_nodes_by_name(&self, name: &str) -> Vec<&Node> {
        self.nodes().filter(|n| n.name == name).collect()
    }

    /// Nodes carrying identifier `value` of kind `kind`
    #[must_use]
    pub fn get_nodes_by_identifier(&self, kind: SoftwareIdentifierType, value: &str) -> Vec<&Node> {
        self.nodes()
            .filter(|n| n.identifiers.get(&kind).is_some_and(|v| v == value))
            .collect()
    }

    /// Nodes listed as root elements, in root order.
    ///
    /// Root ids without a node are skipped.
    #[must_use]
    pub fn get_root_nodes(&self) -> Vec<&Node> {
        self.root_elements
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// The edge leaving `from` with `edge_type`, if any
    #[must_use]
    pub fn get_edge_by_type(&self, from: &str, edge_type: EdgeType) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.from == from && e.edge_type == edge_type)
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Repair referential integrity of the edges.
    ///
    /// Edges from unknown nodes are dropped. The rest are grouped by
    /// (from, type) in first-seen order with their destinations merged,
    /// deduplicated and filtered to known node ids. Groups left without
    /// destinations are dropped. Idempotent.
    pub fn clean_edges(&mut self) {
        let edges = std::mem::take(&mut self.edges);
        let incoming = edges.len();

        let mut merged: Vec<Edge> = Vec::with_capacity(incoming);
        let mut seen: Vec<HashSet<String>> = Vec::with_capacity(incoming);
        let mut slots: HashMap<(String, EdgeType), usize> = HashMap::new();
        let mut dropped_destinations = 0usize;

        for edge in edges {
            if !self.nodes.contains_key(&edge.from) {
                debug!(from = %edge.from, edge_type = %edge.edge_type, "dropping edge from unknown node");
                continue;
            }
            let slot = *slots
                .entry((edge.from.clone(), edge.edge_type))
                .or_insert_with(|| {
                    merged.push(Edge {
                        edge_type: edge.edge_type,
                        from: edge.from.clone(),
                        to: Vec::new(),
                    });
                    seen.push(HashSet::new());
                    merged.len() - 1
                });

            for to in edge.to {
                if !self.nodes.contains_key(&to) {
                    dropped_destinations += 1;
                    continue;
                }
                if seen[slot].insert(to.clone()) {
                    merged[slot].to.push(to);
                }
            }
        }

        merged.retain(|e| !e.to.is_empty());
        if dropped_destinations > 0 || merged.len() != incoming {
            debug!(
                edges_before = incoming,
                edges_after = merged.len(),
                dropped_destinations,
                "cleaned edges"
            );
        }
        self.edges = merged;
    }

    /// [`clean_edges`](Self::clean_edges) plus removal of root elements that
    /// do not name a node.
    pub fn normalize(&mut self) {
        self.clean_edges();
        let nodes = &self.nodes;
        self.root_elements.retain(|id| {
            let keep = nodes.contains_key(id);
            if !keep {
                debug!(root = %id, "dropping dangling root element");
            }
            keep
        });
    }

    // ========================================================================
    // Set algebra
    // ========================================================================

    /// Merge `other` into this list in place.
    ///
    /// Colliding nodes are augmented: existing data wins and `other` only
    /// fills gaps. New nodes are appended, edges merge by (from, type) and
    /// new root elements are appended.
    pub fn add(&mut self, other: &NodeList) {
        for node in other.nodes() {
            match self.nodes.get_mut(&node.id) {
                Some(existing) => existing.augment(node),
                None => {
                    self.nodes.insert(node.id.clone(), node.clone());
                }
            }
        }
        for edge in &other.edges {
            self.add_edge(edge.clone());
        }
        for id in &other.root_elements {
            self.add_root_element(id.clone());
        }
        self.clean_edges();
    }

    /// New list with the nodes of both lists.
    ///
    /// On id collisions the node from `other` wins field by field (see
    /// [`Node::update`]), so the node set is commutative but field values
    /// are not.
    #[must_use]
    pub fn union(&self, other: &NodeList) -> NodeList {
        let mut out = self.copy();
        for node in other.nodes() {
            match out.nodes.get_mut(&node.id) {
                Some(existing) => existing.update(node),
                None => {
                    out.nodes.insert(node.id.clone(), node.clone());
                }
            }
        }
        for edge in &other.edges {
            out.add_edge(edge.clone());
        }
        for id in &other.root_elements {
            out.add_root_element(id.clone());
        }
        out.clean_edges();
        out
    }

    /// New list with only the nodes present in both lists.
    ///
    /// Each surviving node is copied from this list and updated with the
    /// value from `other`. Root elements of either list survive with their
    /// node; edges of both lists are merged and then cleaned.
    #[must_use]
    pub fn intersect(&self, other: &NodeList) -> NodeList {
        let mut out = NodeList::new();
        for node in self.nodes() {
            if let Some(theirs) = other.nodes.get(&node.id) {
                let mut merged = node.clone();
                merged.update(theirs);
                out.nodes.insert(merged.id.clone(), merged);
            }
        }

        for id in self.root_elements.iter().chain(&other.root_elements) {
            if out.nodes.contains_key(id) {
                out.add_root_element(id.clone());
            }
        }

        out.edges = self.edges.clone();
        for edge in &other.edges {
            out.add_edge(edge.clone());
        }
        out.clean_edges();
        out
    }

    /// Remove the listed nodes and any edge data that referenced them.
    ///
    /// Root elements are left for [`normalize`](Self::normalize) to prune.
    pub fn remove_nodes<S: AsRef<str>>(&mut self, ids: &[S]) {
        let doomed: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.nodes.retain(|id, _| !doomed.contains(id.as_str()));
        self.clean_edges();
    }

    // ========================================================================
    // Tree anchoring
    // ========================================================================

    /// Hang `other` below node `node_id`.
    ///
    /// The roots of `other` become destinations of the (`node_id`,
    /// `edge_type`) edge, created if needed. Nodes and edges of `other` are
    /// brought in; nodes already present keep their current data.
    ///
    /// # Errors
    ///
    /// Fails when `node_id` is not a node of this list.
    pub fn relate_node_list_at_id(
        &mut self,
        other: &NodeList,
        node_id: &str,
        edge_type: EdgeType,
    ) -> Result<()> {
        if !self.nodes.contains_key(node_id) {
            return Err(SbomGraphError::node_not_found(node_id));
        }

        self.add_edge(Edge::new(node_id, edge_type, other.root_elements.iter().cloned()));
        for node in other.nodes() {
            if !self.nodes.contains_key(&node.id) {
                self.nodes.insert(node.id.clone(), node.clone());
            }
        }
        for edge in &other.edges {
            self.add_edge(edge.clone());
        }
        Ok(())
    }

    /// Hang a single node below `node_id`.
    ///
    /// # Errors
    ///
    /// Fails when `node_id` is not a node of this list.
    pub fn relate_node_at_id(&mut self, node: &Node, node_id: &str, edge_type: EdgeType) -> Result<()> {
        let fragment = NodeList::new().with_node(node.clone()).with_root(node.id.clone());
        self.relate_node_list_at_id(&fragment, node_id, edge_type)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Deep copy of the list
    #[must_use]
    pub fn copy(&self) -> NodeList {
        self.clone()
    }

    /// True when both lists hold the same nodes, edges and root elements.
    ///
    /// Order never matters: nodes and edges compare by canonical string,
    /// root elements as a set.
    #[must_use]
    pub fn equal(&self, other: &NodeList) -> bool {
        if self.nodes.len() != other.nodes.len()
            || self.edges.len() != other.edges.len()
            || self.root_elements.len() != other.root_elements.len()
        {
            return false;
        }

        let nodes_equal = self.nodes().all(|node| {
            other
                .nodes
                .get(&node.id)
                .is_some_and(|theirs| node.equal(theirs))
        });
        if !nodes_equal {
            return false;
        }

        let mut ours: Vec<String> = self.edges.iter().map(Edge::flat_string).collect();
        let mut theirs: Vec<String> = other.edges.iter().map(Edge::flat_string).collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        if ours != theirs {
            return false;
        }

        let our_roots: HashSet<&String> = self.root_elements.iter().collect();
        let their_roots: HashSet<&String> = other.root_elements.iter().collect();
        our_roots == their_roots
    }
}

impl PartialEq for NodeList {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut nl = NodeList::new();
        for node in iter {
            nl.add_node(node);
        }
        nl
    }
}
