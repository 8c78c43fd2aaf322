//! Sorted-merge diff of two node lists.

use super::NodeDiff;
use crate::config::DiffConfig;
use crate::matching::strip_qualifiers;
use crate::model::{Edge, Node, NodeList};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Added and removed items of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> ChangeSet<T> {
    pub fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Node-level changes: whole nodes added or removed, plus field diffs of
/// nodes present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChanges {
    pub added: Vec<Node>,
    pub removed: Vec<Node>,
    pub node_diff: Vec<NodeDiff>,
}

impl NodeChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.node_diff.is_empty()
    }
}

/// Complete result of [`NodeList::diff`].
///
/// Each section is sorted: nodes by id, edges by canonical string, root
/// elements lexically, node diffs by the canonical string of their added side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct NodeListDiff {
    pub nodes: NodeChanges,
    pub edges: ChangeSet<Edge>,
    pub root_elements: ChangeSet<String>,
}

impl NodeListDiff {
    /// True when both lists were equivalent
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.root_elements.is_empty()
    }

    /// Number of added, removed and modified entries across all sections
    #[must_use]
    pub fn total(&self) -> usize {
        self.nodes.added.len()
            + self.nodes.removed.len()
            + self.nodes.node_diff.len()
            + self.edges.total()
            + self.root_elements.total()
    }

    /// Everything the newer list brings in, as a node list.
    ///
    /// Modified nodes appear as their partial `added` side.
    #[must_use]
    pub fn added_node_list(&self) -> NodeList {
        Self::side_as_list(
            &self.nodes.added,
            &self.edges.added,
            &self.root_elements.added,
            self.nodes.node_diff.iter().map(|nd| &nd.added),
        )
    }

    /// Everything the newer list dropped, as a node list.
    ///
    /// Modified nodes appear as their partial `removed` side.
    #[must_use]
    pub fn removed_node_list(&self) -> NodeList {
        Self::side_as_list(
            &self.nodes.removed,
            &self.edges.removed,
            &self.root_elements.removed,
            self.nodes.node_diff.iter().map(|nd| &nd.removed),
        )
    }

    fn side_as_list<'a>(
        nodes: &'a [Node],
        edges: &[Edge],
        roots: &[String],
        partials: impl Iterator<Item = &'a Node>,
    ) -> NodeList {
        let mut nl = NodeList::new();
        for node in nodes.iter().chain(partials) {
            nl.add_node(node.clone());
        }
        for edge in edges {
            nl.add_edge(edge.clone());
        }
        for root in roots {
            nl.add_root_element(root.clone());
        }
        nl
    }
}

// ============================================================================
// Diff passes
// ============================================================================

/// Copy of a node with purl qualifiers removed from its id and identifiers.
fn strip_node_qualifiers(node: &Node) -> Node {
    let mut stripped = node.clone();
    stripped.id = strip_qualifiers(&node.id);
    for value in stripped.identifiers.values_mut() {
        *value = strip_qualifiers(value);
    }
    stripped
}

fn diff_nodes(old: &NodeList, new: &NodeList, strip: bool) -> NodeChanges {
    let prepare = |nl: &NodeList| -> Vec<Node> {
        let mut nodes: Vec<Node> = if strip {
            nl.nodes().map(strip_node_qualifiers).collect()
        } else {
            nl.nodes().cloned().collect()
        };
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    };
    let ours = prepare(old);
    let theirs = prepare(new);

    let mut changes = NodeChanges::default();
    let (mut i, mut j) = (0, 0);
    while i < ours.len() && j < theirs.len() {
        match ours[i].id.cmp(&theirs[j].id) {
            Ordering::Equal => {
                if let Some(nd) = ours[i].diff(&theirs[j]) {
                    changes.node_diff.push(nd);
                }
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                changes.removed.push(ours[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                changes.added.push(theirs[j].clone());
                j += 1;
            }
        }
    }
    changes.removed.extend_from_slice(&ours[i..]);
    changes.added.extend_from_slice(&theirs[j..]);

    changes
        .node_diff
        .sort_by_cached_key(|nd| nd.added.flat_string());
    changes
}

/// Edges paired with their canonical string, sorted by it.
fn keyed_edges(nl: &NodeList) -> Vec<(String, &Edge)> {
    let mut edges: Vec<(String, &Edge)> = nl.edges.iter().map(|e| (e.flat_string(), e)).collect();
    edges.sort_by(|a, b| a.0.cmp(&b.0));
    edges
}

fn diff_edges(old: &NodeList, new: &NodeList) -> ChangeSet<Edge> {
    let ours = keyed_edges(old);
    let theirs = keyed_edges(new);

    let mut changes = ChangeSet::new();
    let (mut i, mut j) = (0, 0);
    while i < ours.len() && j < theirs.len() {
        match ours[i].0.cmp(&theirs[j].0) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                changes.removed.push(ours[i].1.clone());
                i += 1;
            }
            Ordering::Greater => {
                changes.added.push(theirs[j].1.clone());
                j += 1;
            }
        }
    }
    changes.removed.extend(ours[i..].iter().map(|(_, e)| (*e).clone()));
    changes.added.extend(theirs[j..].iter().map(|(_, e)| (*e).clone()));
    changes
}

fn diff_root_elements(old: &NodeList, new: &NodeList) -> ChangeSet<String> {
    let ours: BTreeSet<&String> = old.root_elements.iter().collect();
    let theirs: BTreeSet<&String> = new.root_elements.iter().collect();
    ChangeSet {
        added: theirs.difference(&ours).map(|s| (*s).clone()).collect(),
        removed: ours.difference(&theirs).map(|s| (*s).clone()).collect(),
    }
}

impl NodeList {
    /// Structural diff against a newer version of this list.
    ///
    /// Never fails: identical lists yield an empty [`NodeListDiff`].
    pub fn diff(&self, other: &NodeList) -> NodeListDiff {
        self.diff_with_config(other, &DiffConfig::default())
    }

    /// Diff with options. Inputs are never modified; qualifier stripping
    /// works on copies.
    pub fn diff_with_config(&self, other: &NodeList, config: &DiffConfig) -> NodeListDiff {
        let diff = NodeListDiff {
            nodes: diff_nodes(self, other, config.strip_purl_qualifiers),
            edges: diff_edges(self, other),
            root_elements: diff_root_elements(self, other),
        };
        debug!(
            nodes_added = diff.nodes.added.len(),
            nodes_removed = diff.nodes.removed.len(),
            nodes_modified = diff.nodes.node_diff.len(),
            edges_added = diff.edges.added.len(),
            edges_removed = diff.edges.removed.len(),
            "diffed node lists"
        );
        diff
    }
}
