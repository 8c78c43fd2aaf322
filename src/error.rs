//! Unified error types for sbom-graph.
//!
//! Only a handful of graph operations can fail: identity reconciliation when
//! the evidence is ambiguous, anchoring onto a node that does not exist, and
//! format registry lookups. Everything else (merges, traversals, diffs) is
//! total over its inputs and repairs dangling references instead of failing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-graph operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomGraphError {
    /// Errors during identity reconciliation
    #[error("Node matching failed: {context}")]
    Matching {
        context: String,
        #[source]
        source: MatchingErrorKind,
    },

    /// Structural integrity errors on the graph
    #[error("Graph operation failed: {context}")]
    Graph {
        context: String,
        #[source]
        source: GraphErrorKind,
    },

    /// Errors looking up or running format drivers
    #[error("Format error: {context}")]
    Format {
        context: String,
        #[source]
        source: FormatErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific matching error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MatchingErrorKind {
    #[error("more than one node matches ({candidates} candidates)")]
    MoreThanOneMatch { candidates: usize },
}

/// Specific graph error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GraphErrorKind {
    #[error("node {0:?} not found in node list")]
    NodeNotFound(String),

    #[error("node list has nodes but no root elements")]
    NoRootElements,
}

/// Specific format error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FormatErrorKind {
    #[error("no format specified")]
    NoFormat,

    #[error("no driver registered for format {0}")]
    NotRegistered(String),

    #[error("encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-graph operations
pub type Result<T> = std::result::Result<T, SbomGraphError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomGraphError {
    /// Create a matching error with context
    pub fn matching(context: impl Into<String>, source: MatchingErrorKind) -> Self {
        Self::Matching {
            context: context.into(),
            source,
        }
    }

    /// Create the error returned when hash and purl evidence cannot single out a node
    #[must_use]
    pub fn more_than_one_match(candidates: usize) -> Self {
        Self::matching(
            "ambiguous hash/purl evidence",
            MatchingErrorKind::MoreThanOneMatch { candidates },
        )
    }

    /// Create a graph error with context
    pub fn graph(context: impl Into<String>, source: GraphErrorKind) -> Self {
        Self::Graph {
            context: context.into(),
            source,
        }
    }

    /// Create a graph error for a node id that is not part of the node list
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::graph("looking up node", GraphErrorKind::NodeNotFound(id.into()))
    }

    /// Create a format error with context
    pub fn format(context: impl Into<String>, source: FormatErrorKind) -> Self {
        Self::Format {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true if this is an ambiguous-match error
    #[must_use]
    pub const fn is_more_than_one_match(&self) -> bool {
        matches!(
            self,
            Self::Matching {
                source: MatchingErrorKind::MoreThanOneMatch { .. },
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomGraphError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::format("JSON encoding", FormatErrorKind::Encoding(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained, so an error bubbling through several layers
/// reads `outer: middle: inner`.
///
/// ```ignore
/// use sbom_graph::error::ErrorContext;
///
/// nodelist
///     .relate_node_list_at_id(&fragment, &parent_id, EdgeType::Contains)
///     .with_context(|| format!("anchoring fragment under {parent_id}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomGraphError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SbomGraphError, new_ctx: &str) -> SbomGraphError {
    match err {
        SbomGraphError::Matching {
            context: existing,
            source,
        } => SbomGraphError::Matching {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::Graph {
            context: existing,
            source,
        } => SbomGraphError::Graph {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::Format {
            context: existing,
            source,
        } => SbomGraphError::Format {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::Io {
            path,
            message,
            source,
        } => SbomGraphError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomGraphError::Config(msg) => SbomGraphError::Config(chain_context(new_ctx, &msg)),
        SbomGraphError::Validation(msg) => {
            SbomGraphError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SbomGraphError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SbomGraphError::Validation(f().into()))
    }
}
