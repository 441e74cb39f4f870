//! Fragment errors

use thiserror::Error;

/// Errors from fragment lookup and resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// Key absent from the catalog
    #[error("fragment not found: {key} (nearest: {})", .alternatives.join(", "))]
    FragmentNotFound {
        /// Missing key
        key: String,
        /// Closest existing keys, best first
        alternatives: Vec<String>,
    },

    /// Key template without a `{hint}` placeholder
    #[error("key template {template:?} has no {{hint}} placeholder")]
    InvalidTemplate {
        /// Offending template
        template: String,
    },

    /// Catalog document could not be parsed
    #[error("catalog parse error: {0}")]
    Parse(String),
}

impl FragmentError {
    /// Offending key, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::FragmentNotFound { key, .. } => Some(key),
            _ => None,
        }
    }
}
