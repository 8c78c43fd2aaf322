//! Flattening a node list back into nested trees.
//!
//! Tree-shaped formats nest components below their parents. A node list is a
//! general graph, so flattening is lossy when a node has more than one parent,
//! when nesting edges form a cycle, or when a nesting edge points at another
//! root element. Each such loss is recorded as a [`Degradation`] and logged.

use crate::config::TraversalConfig;
use crate::error::{GraphErrorKind, Result, SbomGraphError};
use crate::model::{EdgeType, Node, NodeList, NodeListIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// A node with the nodes nested below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub node: Node,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Ids of this subtree in pre-order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut out = vec![self.node.id.as_str()];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }

    /// Number of nodes in this subtree
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }

    /// Find a direct child by node id
    #[must_use]
    pub fn child(&self, id: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.node.id == id)
    }
}

/// Structure that could not be represented while nesting
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// `child` was already placed under another parent
    SharedChild { parent: String, child: String },
    /// `child` is an ancestor of `parent`
    Cycle { parent: String, child: String },
    /// Nesting edge into another root element, which stays top-level
    DroppedRelationship {
        from: String,
        to: String,
        edge_type: EdgeType,
    },
    /// Node not reachable from any root through nesting edges
    Unreachable { id: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedChild { parent, child } => {
                write!(f, "shared child {child} not nested again under {parent}")
            }
            Self::Cycle { parent, child } => {
                write!(f, "cycle: {child} is an ancestor of {parent}")
            }
            Self::DroppedRelationship { from, to, edge_type } => {
                write!(f, "dropped {from} --{edge_type}--> root element {to}")
            }
            Self::Unreachable { id } => write!(f, "{id} is not reachable from any root"),
        }
    }
}

/// Result of [`NodeList::flatten_tree`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFlattening {
    /// One tree per root element, in root element order
    pub roots: Vec<TreeNode>,
    pub degradations: Vec<Degradation>,
}

impl TreeFlattening {
    /// True when the graph was a forest and nothing was lost
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.degradations.is_empty()
    }

    /// Total number of nodes placed in the trees
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }
}

struct TreeBuilder<'a> {
    nodes: &'a NodeList,
    index: NodeListIndex<'a>,
    config: &'a TraversalConfig,
    roots: HashSet<&'a str>,
    placed: HashSet<String>,
    ancestors: HashSet<&'a str>,
    degradations: Vec<Degradation>,
}

/// A tree under construction plus the nesting edges it has yet to follow
struct Frame {
    tree: TreeNode,
    pending: std::vec::IntoIter<(EdgeType, String)>,
}

impl<'a> TreeBuilder<'a> {
    fn degrade(&mut self, degradation: Degradation) {
        warn!("tree flattening: {degradation}");
        self.degradations.push(degradation);
    }

    fn open(&self, node: &Node) -> Frame {
        let below = self
            .nodes
            .index_descendants(&self.index, &node.id, self.config.descendant_depth);
        let pending: Vec<(EdgeType, String)> = below
            .edges
            .iter()
            .filter(|e| e.from == node.id && self.config.is_tree_edge(e.edge_type))
            .flat_map(|e| e.to.iter().map(move |to| (e.edge_type, to.clone())))
            .collect();
        Frame {
            tree: TreeNode::leaf(node.clone()),
            pending: pending.into_iter(),
        }
    }

    /// Decide whether `to` nests below `parent`; returns the node to open.
    fn admit(&mut self, parent: &str, edge_type: EdgeType, to: String) -> Option<&'a Node> {
        if self.ancestors.contains(to.as_str()) {
            self.degrade(Degradation::Cycle {
                parent: parent.to_string(),
                child: to,
            });
        } else if self.roots.contains(to.as_str()) {
            self.degrade(Degradation::DroppedRelationship {
                from: parent.to_string(),
                to,
                edge_type,
            });
        } else if self.placed.contains(&to) {
            self.degrade(Degradation::SharedChild {
                parent: parent.to_string(),
                child: to,
            });
        } else if let Some(child) = self.index.node(&to) {
            self.placed.insert(to);
            return Some(child);
        }
        None
    }

    /// Depth-first nesting below `root` with an explicit stack, so long
    /// chains do not grow the call stack.
    fn build(&mut self, root: &'a Node) -> TreeNode {
        let mut base = self.open(root);
        let mut stack: Vec<Frame> = Vec::new();
        self.ancestors.insert(root.id.as_str());

        loop {
            let top = stack.last_mut().unwrap_or(&mut base);
            match top.pending.next() {
                Some((edge_type, to)) => {
                    let parent = top.tree.node.id.clone();
                    if let Some(child) = self.admit(&parent, edge_type, to) {
                        self.ancestors.insert(child.id.as_str());
                        stack.push(self.open(child));
                    }
                }
                None => match stack.pop() {
                    Some(done) => {
                        self.ancestors.remove(done.tree.node.id.as_str());
                        stack
                            .last_mut()
                            .unwrap_or(&mut base)
                            .tree
                            .children
                            .push(done.tree);
                    }
                    None => break,
                },
            }
        }

        self.ancestors.remove(root.id.as_str());
        base.tree
    }
}

impl NodeList {
    /// Nest the graph below its root elements.
    ///
    /// Only edges whose type is listed in `config.tree_edge_types` nest their
    /// destinations. Every node appears at most once; whatever cannot be
    /// represented is reported in [`TreeFlattening::degradations`].
    ///
    /// # Errors
    ///
    /// Fails with [`GraphErrorKind::NoRootElements`] when the list has nodes
    /// but none of its root elements names one.
    pub fn flatten_tree(&self, config: &TraversalConfig) -> Result<TreeFlattening> {
        if self.is_empty() {
            return Ok(TreeFlattening::default());
        }
        let root_nodes = self.get_root_nodes();
        if root_nodes.is_empty() {
            return Err(SbomGraphError::graph(
                "flattening node list into trees",
                GraphErrorKind::NoRootElements,
            ));
        }

        let mut builder = TreeBuilder {
            nodes: self,
            index: self.index(),
            config,
            roots: root_nodes.iter().map(|n| n.id.as_str()).collect(),
            placed: root_nodes.iter().map(|n| n.id.clone()).collect(),
            ancestors: HashSet::new(),
            degradations: Vec::new(),
        };

        let mut trees = Vec::with_capacity(root_nodes.len());
        for root in root_nodes {
            trees.push(builder.build(root));
        }

        let unplaced: Vec<String> = self
            .node_ids()
            .filter(|id| !builder.placed.contains(*id))
            .map(str::to_string)
            .collect();
        for id in unplaced {
            builder.degrade(Degradation::Unreachable { id });
        }

        debug!(
            trees = trees.len(),
            degradations = builder.degradations.len(),
            "flattened node list"
        );
        Ok(TreeFlattening {
            roots: trees,
            degradations: builder.degradations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn graph(ids: &[&str], edges: &[(&str, EdgeType, &[&str])], roots: &[&str]) -> NodeList {
        let mut nl: NodeList = ids.iter().map(|id| Node::new_package(*id)).collect();
        for (from, edge_type, to) in edges {
            nl.add_edge(Edge::new(*from, *edge_type, to.iter().copied()));
        }
        for root in roots {
            nl.add_root_element(*root);
        }
        nl
    }

    #[test]
    fn test_flatten_simple_tree() {
        let nl = graph(
            &["root", "a", "b", "c"],
            &[
                ("root", EdgeType::Contains, &["a", "b"]),
                ("a", EdgeType::Contains, &["c"]),
            ],
            &["root"],
        );
        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();

        assert!(flat.is_lossless());
        assert_eq!(flat.roots.len(), 1);
        assert_eq!(flat.roots[0].ids(), vec!["root", "a", "c", "b"]);
        assert_eq!(flat.node_count(), 4);
        assert!(flat.roots[0].child("a").unwrap().child("c").is_some());
    }

    #[test]
    fn test_shared_child_nested_once() {
        let nl = graph(
            &["root", "a", "b", "c"],
            &[
                ("root", EdgeType::Contains, &["a", "b"]),
                ("a", EdgeType::Contains, &["c"]),
                ("b", EdgeType::Contains, &["c"]),
            ],
            &["root"],
        );
        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();

        assert_eq!(flat.node_count(), 4);
        assert_eq!(
            flat.degradations,
            vec![Degradation::SharedChild {
                parent: "b".into(),
                child: "c".into()
            }]
        );
    }

    #[test]
    fn test_cycle_terminates() {
        let nl = graph(
            &["root", "a", "b"],
            &[
                ("root", EdgeType::Contains, &["a"]),
                ("a", EdgeType::Contains, &["b"]),
                ("b", EdgeType::Contains, &["a"]),
            ],
            &["root"],
        );
        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();

        assert_eq!(flat.roots[0].ids(), vec!["root", "a", "b"]);
        assert_eq!(
            flat.degradations,
            vec![Degradation::Cycle {
                parent: "b".into(),
                child: "a".into()
            }]
        );
    }

    #[test]
    fn test_edge_into_other_root_is_dropped() {
        let nl = graph(
            &["r1", "r2", "x"],
            &[
                ("r1", EdgeType::Contains, &["r2"]),
                ("r2", EdgeType::Contains, &["x"]),
            ],
            &["r1", "r2"],
        );
        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();

        assert_eq!(flat.roots.len(), 2);
        assert_eq!(flat.roots[0].ids(), vec!["r1"]);
        assert_eq!(flat.roots[1].ids(), vec!["r2", "x"]);
        assert_eq!(
            flat.degradations,
            vec![Degradation::DroppedRelationship {
                from: "r1".into(),
                to: "r2".into(),
                edge_type: EdgeType::Contains,
            }]
        );
    }

    #[test]
    fn test_only_tree_edges_nest() {
        let nl = graph(
            &["root", "a", "dep"],
            &[
                ("root", EdgeType::Contains, &["a"]),
                ("a", EdgeType::DependsOn, &["dep"]),
            ],
            &["root"],
        );

        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();
        assert_eq!(flat.node_count(), 2);
        assert_eq!(
            flat.degradations,
            vec![Degradation::Unreachable { id: "dep".into() }]
        );

        let config = TraversalConfig {
            tree_edge_types: vec![EdgeType::Contains, EdgeType::DependsOn],
            ..TraversalConfig::default()
        };
        let flat = nl.flatten_tree(&config).unwrap();
        assert!(flat.is_lossless());
        assert_eq!(flat.roots[0].ids(), vec!["root", "a", "dep"]);
    }

    #[test]
    fn test_deeper_descendant_window() {
        let nl = graph(
            &["root", "a", "b", "c"],
            &[
                ("root", EdgeType::Contains, &["a"]),
                ("a", EdgeType::Contains, &["b"]),
                ("b", EdgeType::Contains, &["c"]),
            ],
            &["root"],
        );
        let config = TraversalConfig {
            descendant_depth: 5,
            ..TraversalConfig::default()
        };
        let flat = nl.flatten_tree(&config).unwrap();
        assert_eq!(flat.roots[0].ids(), vec!["root", "a", "b", "c"]);
    }

    #[test]
    fn test_long_chain_nests_fully() {
        const LEN: usize = 1_000;
        let ids: Vec<String> = (0..LEN).map(|i| format!("n{i}")).collect();
        let mut nl: NodeList = ids.iter().map(|id| Node::new_package(id.as_str())).collect();
        for pair in ids.windows(2) {
            nl.add_edge(Edge::new(pair[0].as_str(), EdgeType::Contains, [pair[1].as_str()]));
        }
        nl.add_root_element("n0");

        let flat = nl.flatten_tree(&TraversalConfig::default()).unwrap();

        assert!(flat.is_lossless());
        assert_eq!(flat.node_count(), LEN);
        let mut depth = 1;
        let mut cursor = &flat.roots[0];
        while let Some(child) = cursor.children.first() {
            depth += 1;
            cursor = child;
        }
        assert_eq!(depth, LEN);
        assert_eq!(cursor.node.id, format!("n{}", LEN - 1));
    }

    #[test]
    fn test_empty_and_rootless() {
        let flat = NodeList::new()
            .flatten_tree(&TraversalConfig::default())
            .unwrap();
        assert!(flat.roots.is_empty());

        let rootless = graph(&["a"], &[], &["ghost"]);
        let err = rootless
            .flatten_tree(&TraversalConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SbomGraphError::Graph {
                source: GraphErrorKind::NoRootElements,
                ..
            }
        ));
    }

    #[test]
    fn test_degradation_display() {
        let d = Degradation::DroppedRelationship {
            from: "a".into(),
            to: "b".into(),
            edge_type: EdgeType::Contains,
        };
        assert_eq!(d.to_string(), "dropped a --contains--> root element b");
    }
}
