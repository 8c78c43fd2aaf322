//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::GraphConfig;
use crate::error::SbomGraphError;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[".sbom-graph.yaml", ".sbom-graph.yml", "sbom-graph.yaml"];

/// Directory below the user config dir that may hold a config file
const USER_CONFIG_DIR: &str = "sbom-graph";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/sbom-graph/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join(USER_CONFIG_DIR)))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl From<ConfigFileError> for SbomGraphError {
    fn from(err: ConfigFileError) -> Self {
        Self::config(err.to_string())
    }
}

/// Load a `GraphConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<GraphConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: GraphConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (GraphConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (GraphConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (GraphConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl GraphConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.identifiers.prefix != defaults.identifiers.prefix {
            self.identifiers.prefix.clone_from(&other.identifiers.prefix);
        }
        if other.diff.strip_purl_qualifiers {
            self.diff.strip_purl_qualifiers = true;
        }
        if other.traversal.tree_edge_types != defaults.traversal.tree_edge_types {
            self.traversal
                .tree_edge_types
                .clone_from(&other.traversal.tree_edge_types);
        }
        if other.traversal.descendant_depth != defaults.traversal.descendant_depth {
            self.traversal.descendant_depth = other.traversal.descendant_depth;
        }
    }
}

/// Commented example configuration with every option at its default.
#[must_use]
pub fn generate_example_config() -> String {
    r"# sbom-graph configuration
# Place as .sbom-graph.yaml in your project or ~/.config/sbom-graph/

identifiers:
  # Prefix of synthetic node ids: <prefix>-<flags>--<slug>
  prefix: protobom

diff:
  # Ignore purl qualifiers (?arch=...) in node ids and identifiers
  strip_purl_qualifiers: false

traversal:
  # Edge types that nest their destinations when flattening to a tree
  tree_edge_types:
    - contains
  # Depth per tree level, the node itself counts as one
  descendant_depth: 2
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validatable;
    use crate::model::EdgeType;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-graph.yaml");
        std::fs::write(&config_path, "identifiers:\n  prefix: acme\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
identifiers:
  prefix: acme
diff:
  strip_purl_qualifiers: true
traversal:
  tree_edge_types: [contains, packages]
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.identifiers.prefix, "acme");
        assert!(config.diff.strip_purl_qualifiers);
        assert_eq!(
            config.traversal.tree_edge_types,
            vec![EdgeType::Contains, EdgeType::Packages]
        );
        assert_eq!(config.traversal.descendant_depth, 2);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "traversal:\n  tree_edge_types: [nesting]\n").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse(_)));

        let graph_err: SbomGraphError = err.into();
        assert!(graph_err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "identifiers: [").unwrap();

        let (config, loaded_from) = load_or_default(Some(&config_path));
        assert_eq!(config, GraphConfig::default());
        assert_eq!(loaded_from, None);
    }

    #[test]
    fn test_config_merge() {
        let mut base = GraphConfig::builder().descendant_depth(4).build();
        let override_config = GraphConfig::builder()
            .id_prefix("acme")
            .strip_purl_qualifiers(true)
            .build();

        base.merge(&override_config);

        assert_eq!(base.identifiers.prefix, "acme");
        assert!(base.diff.strip_purl_qualifiers);
        assert_eq!(base.traversal.descendant_depth, 4);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let example = generate_example_config();
        let config: GraphConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(config, GraphConfig::default());
        assert!(config.is_valid());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "identifiers:\n  prefix: custom").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
