//! Configuration for sbom-graph.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - Layered merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sbom_graph::config::{GraphConfig, Validatable};
//!
//! let config = GraphConfig::builder()
//!     .id_prefix("acme")
//!     .strip_purl_qualifiers(true)
//!     .build();
//! assert!(config.is_valid());
//!
//! use sbom_graph::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-graph.yaml` file in your project root or `~/.config/sbom-graph/`:
//!
//! ```yaml
//! identifiers:
//!   prefix: acme
//! traversal:
//!   tree_edge_types: [contains, packages]
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_DESCENDANT_DEPTH, DEFAULT_TREE_EDGE_TYPES, MIN_DESCENDANT_DEPTH};
pub use types::{DiffConfig, GraphConfig, GraphConfigBuilder, IdentifierConfig, TraversalConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `GraphConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.sbom-graph.yaml` files.
///
/// # Errors
///
/// Fails only if the schema cannot be encoded as JSON.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(GraphConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
