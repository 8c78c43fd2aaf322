//! Configuration validation.

use super::defaults::MIN_DESCENDANT_DEPTH;
use super::types::{DiffConfig, GraphConfig, IdentifierConfig, TraversalConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for GraphConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.identifiers.validate());
        errors.extend(self.diff.validate());
        errors.extend(self.traversal.validate());
        errors
    }
}

impl Validatable for IdentifierConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.prefix.is_empty() {
            errors.push(ConfigError::new("identifiers.prefix", "Prefix must not be empty"));
        } else if let Some(bad) = self
            .prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            errors.push(ConfigError::new(
                "identifiers.prefix",
                format!(
                    "Invalid character '{bad}' in prefix '{}'. Allowed: a-z A-Z 0-9 - .",
                    self.prefix
                ),
            ));
        }
        errors
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for TraversalConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.tree_edge_types.is_empty() {
            errors.push(ConfigError::new(
                "traversal.tree_edge_types",
                "At least one nesting edge type is required",
            ));
        }
        if self.descendant_depth < MIN_DESCENDANT_DEPTH {
            errors.push(ConfigError::new(
                "traversal.descendant_depth",
                format!(
                    "Depth must be at least {MIN_DESCENDANT_DEPTH}, got {}",
                    self.descendant_depth
                ),
            ));
        }
        errors
    }
}
