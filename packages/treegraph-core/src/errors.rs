//! Error types for treegraph-core
//!
//! Provides unified error handling across the crate.
//!
//! An empty result (no survivors, no matches, no path) is never an error;
//! operations return an empty collection or `Vec` instead.

use thiserror::Error;

use crate::config::ConfigError;

/// Error raised by caller-supplied callbacks (edge predicates, attribute
/// builders, node/edge matchers).
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for caller-supplied callbacks
pub type CallbackResult<T> = std::result::Result<T, CallbackError>;

/// Main error type for treegraph-core operations
#[derive(Debug, Error)]
pub enum TreegraphError {
    /// A caller-supplied edge/attribute/matcher function failed or returned an
    /// inconsistent value. `context` names the offending node pair or indices.
    #[error("Invalid graph operation at {context}: {reason}")]
    InvalidGraphOperation { context: String, reason: String },

    /// A search or enumeration budget was exceeded. Distinct from an exhaustive
    /// search that found nothing.
    #[error("Resource exhausted: {resource} exceeded limit of {limit}")]
    ResourceExhausted { resource: &'static str, limit: usize },

    /// Two nodes share a structural fingerprint but differ structurally.
    /// Set algebra over such nodes is undefined, so the operation is aborted.
    #[error("Identity inconsistency between {left} and {right}")]
    IdentityInconsistency { left: String, right: String },

    /// Tree invariant or registry validator violated during construction
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// Parser collaborator failed to produce a tree
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TreegraphError {
    /// Create an invalid graph operation error
    pub fn invalid_operation(context: impl Into<String>, reason: impl ToString) -> Self {
        TreegraphError::InvalidGraphOperation {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a resource exhaustion error
    pub fn exhausted(resource: &'static str, limit: usize) -> Self {
        TreegraphError::ResourceExhausted { resource, limit }
    }

    /// Create an invalid tree error
    pub fn invalid_tree(msg: impl Into<String>) -> Self {
        TreegraphError::InvalidTree(msg.into())
    }

    /// True for budget failures (as opposed to exhaustive-empty outcomes)
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, TreegraphError::ResourceExhausted { .. })
    }
}

/// Result type alias for treegraph operations
pub type Result<T> = std::result::Result<T, TreegraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TreegraphError::exhausted("matcher states", 10);
        assert_eq!(
            err.to_string(),
            "Resource exhausted: matcher states exceeded limit of 10"
        );
        assert!(err.is_resource_exhausted());

        let err = TreegraphError::invalid_operation("identifier@0..3 -> call@4..9", "boom");
        assert!(err.to_string().contains("identifier@0..3 -> call@4..9"));
        assert!(!err.is_resource_exhausted());
    }

    #[test]
    fn test_callback_error_from_str() {
        let err: CallbackError = "bad attribute".into();
        let wrapped = TreegraphError::invalid_operation("node#1", err);
        assert!(wrapped.to_string().ends_with("bad attribute"));
    }
}
