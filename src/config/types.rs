//! Configuration types for graph operations.

use super::defaults::{DEFAULT_DESCENDANT_DEPTH, DEFAULT_TREE_EDGE_TYPES};
use crate::model::{EdgeType, NodeIdGenerator, DEFAULT_ID_PREFIX};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Top-level configuration
// ============================================================================

/// Configuration for the graph library.
///
/// Every section has working defaults, so an empty config file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    /// Synthetic node identifier settings
    pub identifiers: IdentifierConfig,
    /// Node list diff settings
    pub diff: DiffConfig,
    /// Tree flattening and descendant traversal settings
    pub traversal: TraversalConfig,
}

impl GraphConfig {
    /// Create a `GraphConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `GraphConfig` builder.
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }
}

/// Synthetic identifier settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IdentifierConfig {
    /// Prefix of generated ids (`<prefix>-<flags>--<slug>`)
    pub prefix: String,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl IdentifierConfig {
    /// A fresh id generator using this prefix
    #[must_use]
    pub fn generator(&self) -> NodeIdGenerator {
        NodeIdGenerator::new(self.prefix.clone())
    }
}

/// Node list diff settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffConfig {
    /// Compare node ids and identifier values with purl qualifiers removed
    pub strip_purl_qualifiers: bool,
}

/// Traversal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TraversalConfig {
    /// Edge types that express nesting when flattening into a tree
    pub tree_edge_types: Vec<EdgeType>,
    /// Depth handed to `node_descendants` at each tree level (the node
    /// itself counts as one)
    pub descendant_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            tree_edge_types: DEFAULT_TREE_EDGE_TYPES.to_vec(),
            descendant_depth: DEFAULT_DESCENDANT_DEPTH,
        }
    }
}

impl TraversalConfig {
    /// True if edges of `edge_type` nest their destinations
    #[must_use]
    pub fn is_tree_edge(&self, edge_type: EdgeType) -> bool {
        self.tree_edge_types.contains(&edge_type)
    }
}

// ============================================================================
// Builder for GraphConfig
// ============================================================================

/// Builder for constructing `GraphConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct GraphConfigBuilder {
    config: GraphConfig,
}

impl GraphConfigBuilder {
    /// Set the synthetic id prefix.
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.identifiers.prefix = prefix.into();
        self
    }

    /// Strip purl qualifiers before diffing.
    pub const fn strip_purl_qualifiers(mut self, strip: bool) -> Self {
        self.config.diff.strip_purl_qualifiers = strip;
        self
    }

    /// Replace the set of nesting edge types.
    pub fn tree_edge_types(mut self, types: impl IntoIterator<Item = EdgeType>) -> Self {
        self.config.traversal.tree_edge_types = types.into_iter().collect();
        self
    }

    /// Set the per-level descendant depth.
    pub const fn descendant_depth(mut self, depth: usize) -> Self {
        self.config.traversal.descendant_depth = depth;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> GraphConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.identifiers.prefix, "protobom");
        assert!(!config.diff.strip_purl_qualifiers);
        assert_eq!(config.traversal.tree_edge_types, vec![EdgeType::Contains]);
        assert_eq!(config.traversal.descendant_depth, 2);
    }

    #[test]
    fn test_builder() {
        let config = GraphConfig::builder()
            .id_prefix("acme")
            .strip_purl_qualifiers(true)
            .tree_edge_types([EdgeType::Contains, EdgeType::Packages])
            .descendant_depth(3)
            .build();

        assert_eq!(config.identifiers.prefix, "acme");
        assert!(config.diff.strip_purl_qualifiers);
        assert!(config.traversal.is_tree_edge(EdgeType::Packages));
        assert!(!config.traversal.is_tree_edge(EdgeType::DependsOn));
        assert_eq!(config.traversal.descendant_depth, 3);

        let mut generator = config.identifiers.generator();
        assert_eq!(generator.next_id(&["node"]), "acme-node--1");
    }
}
