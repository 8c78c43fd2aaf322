//! Bounded and unbounded traversals that cut sub-lists out of a node list.
//!
//! Every traversal returns a fresh [`NodeList`] rooted at the start node.
//! Root elements other than the start node act as subgraph boundaries: the
//! walk never expands past them. All walks carry a visited set, so cycles
//! terminate.

use crate::matching::purl_has_type;
use crate::model::{NodeList, NodeListIndex};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

impl NodeList {
    /// The node itself plus every node one outgoing edge away, with those
    /// edges. The start node is the sole root.
    ///
    /// An unknown id yields an empty list.
    #[must_use]
    pub fn node_siblings(&self, id: &str) -> NodeList {
        let mut out = NodeList::new();
        let Some(node) = self.get_node_by_id(id) else {
            return out;
        };
        out.add_node(node.clone());
        out.add_root_element(id);

        for edge in self.edges.iter().filter(|e| e.from == id) {
            for to in &edge.to {
                if let Some(child) = self.get_node_by_id(to) {
                    if !out.contains_node(to) {
                        out.add_node(child.clone());
                    }
                }
            }
            out.add_edge(edge.clone());
        }
        out.clean_edges();
        out
    }

    /// Ids of every node reachable from `id`, `id` included.
    ///
    /// Other root elements are boundaries and are left out entirely.
    fn index_connected_nodes(&self, index: &NodeListIndex<'_>, id: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        visited.insert(id.to_string());
        queue.push_back(id.to_string());

        while let Some(current) = queue.pop_front() {
            for &pos in index.edges_leaving(&current) {
                for to in &self.edges[pos].to {
                    if to != id && index.is_root(to) {
                        continue;
                    }
                    if index.contains(to) && visited.insert(to.clone()) {
                        queue.push_back(to.clone());
                    }
                }
            }
            order.push(current);
        }
        order
    }

    /// Everything connected below `id`, rooted at `id`.
    ///
    /// Returns `None` when `id` is not a node of this list. Other root
    /// elements and whatever hangs only below them are excluded.
    #[must_use]
    pub fn node_graph(&self, id: &str) -> Option<NodeList> {
        if !self.contains_node(id) {
            return None;
        }
        let index = self.index();
        let connected = self.index_connected_nodes(&index, id);
        let members: HashSet<&str> = connected.iter().map(String::as_str).collect();

        let mut out = NodeList::new();
        for member in &connected {
            if let Some(node) = index.node(member) {
                out.add_node(node.clone());
            }
        }
        for edge in self.edges.iter().filter(|e| members.contains(e.from.as_str())) {
            out.add_edge(edge.clone());
        }
        out.add_root_element(id);
        out.clean_edges();
        debug!(root = id, nodes = out.len(), "extracted node graph");
        Some(out)
    }

    /// Nodes below `id`, at most `max_depth` levels deep counting `id` itself
    /// as level one.
    ///
    /// Other root elements reached on the way are included but not expanded.
    /// An unknown id yields an empty list.
    #[must_use]
    pub fn node_descendants(&self, id: &str, max_depth: usize) -> NodeList {
        self.index_descendants(&self.index(), id, max_depth)
    }

    /// [`NodeList::node_descendants`] over an index the caller already built.
    pub(crate) fn index_descendants<'a>(
        &'a self,
        index: &NodeListIndex<'a>,
        id: &str,
        max_depth: usize,
    ) -> NodeList {
        let mut out = NodeList::new();
        let Some(start) = index.node(id) else {
            return out;
        };

        out.add_node(start.clone());
        out.add_root_element(id);

        let mut visited: HashSet<&str> = HashSet::new();
        let mut frontier: Vec<&str> = vec![start.id.as_str()];

        for _ in 1..max_depth {
            let mut next: Vec<&str> = Vec::new();
            for current in frontier {
                if !visited.insert(current) {
                    continue;
                }
                if current != id && index.is_root(current) {
                    continue;
                }
                for &pos in index.edges_leaving(current) {
                    let edge = &self.edges[pos];
                    for to in &edge.to {
                        if let Some(child) = index.node(to) {
                            if !out.contains_node(to) {
                                out.add_node(child.clone());
                            }
                            next.push(child.id.as_str());
                        }
                    }
                    out.add_edge(edge.clone());
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        out.clean_edges();
        out
    }

    /// Sub-list of the packages whose purl is of ecosystem type `kind`.
    ///
    /// Accepts both `pkg:<kind>/...` and `pkg:/<kind>/...`. Edges leaving a
    /// surviving node are kept; surviving nodes left without outgoing edges
    /// become roots so nothing is unreachable.
    #[must_use]
    pub fn get_nodes_by_purl_type(&self, kind: &str) -> NodeList {
        let mut out = NodeList::new();
        for node in self.nodes() {
            if node.purl().is_some_and(|purl| purl_has_type(purl, kind)) {
                out.add_node(node.clone());
            }
        }

        out.edges = self
            .edges
            .iter()
            .filter(|e| out.contains_node(&e.from))
            .cloned()
            .collect();
        for root in &self.root_elements {
            if out.contains_node(root) {
                out.add_root_element(root.clone());
            }
        }

        out.reconnect_orphan_nodes();
        out.clean_edges();
        out
    }

    /// Promote every node without outgoing edges to a root element.
    fn reconnect_orphan_nodes(&mut self) {
        let sources: HashSet<&str> = self.edges.iter().map(|e| e.from.as_str()).collect();
        let orphans: Vec<String> = self
            .node_ids()
            .filter(|id| !sources.contains(id) && !self.root_elements.iter().any(|r| r == id))
            .map(str::to_string)
            .collect();
        if !orphans.is_empty() {
            debug!(count = orphans.len(), "promoting orphan nodes to root elements");
        }
        for id in orphans {
            self.add_root_element(id);
        }
    }
}
