//! Error types for the genome service
//!
//! Each layer keeps its own error enum; [`GenomeError`] wraps them and
//! [`ErrorKind`] flattens them into one stable, serializable code for an
//! API layer to map onto its own status codes.

use genome_fragments::FragmentError;
use genome_log::LogError;
use genome_model::{ModelError, NodeId};
use genome_nav::NavError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Main service error type
#[derive(Debug, thiserror::Error)]
pub enum GenomeError {
    /// Document failed validation
    #[error("invalid document: {0}")]
    Model(#[from] ModelError),

    /// Append, replay or snapshot failed
    #[error(transparent)]
    Log(#[from] LogError),

    /// Navigation failed
    #[error(transparent)]
    Nav(#[from] NavError),

    /// Fragment resolution failed
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    /// Lookup by id failed
    #[error("node not found: {id}")]
    NotFound {
        /// Missing id
        id: NodeId,
    },

    /// No open session with this id
    #[error("session not found: {id}")]
    SessionNotFound {
        /// Session id
        id: Uuid,
    },

    /// Request is missing a field its action needs
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Input could not be parsed
    #[error("invalid document {}: {reason}", .path.as_ref().map_or_else(|| "<input>".to_string(), |p| p.display().to_string()))]
    InvalidDocument {
        /// Source file, if any
        path: Option<PathBuf>,
        /// Parser message
        reason: String,
    },

    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(String),

    /// File could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Stable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Lookup by id failed
    NotFound,
    /// Id collision
    DuplicateId,
    /// Malformed or inapplicable edit or request
    InvalidOperation,
    /// Edit target missing
    TargetNotFound,
    /// Remove-child of an absent child
    ChildNotFound,
    /// Navigation outside the current scope
    OutOfScope,
    /// Exit at root
    AtRoot,
    /// Snapshot name in use
    DuplicateSnapshotName,
    /// Fragment key missing from the catalog
    FragmentNotFound,
    /// Document failed to parse or validate
    InvalidDocument,
    /// Seq past the log head
    SequenceOutOfRange,
    /// Unknown session
    SessionNotFound,
    /// Log chain broken
    IntegrityViolation,
    /// Configuration rejected
    Config,
    /// File unreadable
    Io,
    /// Invariant broken inside the service
    Internal,
}

impl ErrorKind {
    /// Whether the caller can fix this by changing the request
    #[must_use]
    pub fn is_client_error(self) -> bool {
        !matches!(self, Self::IntegrityViolation | Self::Io | Self::Internal)
    }
}

fn log_kind(err: &LogError) -> ErrorKind {
    match err.root_cause() {
        LogError::TargetNotFound { .. } => ErrorKind::TargetNotFound,
        LogError::ChildNotFound { .. } => ErrorKind::ChildNotFound,
        LogError::DuplicateId { .. } => ErrorKind::DuplicateId,
        LogError::InvalidOperation { .. }
        | LogError::MalformedPayload { .. }
        | LogError::InvalidSnapshotName { .. } => ErrorKind::InvalidOperation,
        LogError::DuplicateSnapshotName { .. } => ErrorKind::DuplicateSnapshotName,
        LogError::SnapshotNotFound { .. } => ErrorKind::NotFound,
        LogError::SequenceOutOfRange { .. } => ErrorKind::SequenceOutOfRange,
        LogError::IntegrityViolation { .. } => ErrorKind::IntegrityViolation,
        LogError::ReplayFailed { .. } | LogError::Serialization(_) => ErrorKind::Internal,
    }
}

impl GenomeError {
    /// Classification of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Model(ModelError::DuplicateId { .. }) => ErrorKind::DuplicateId,
            Self::Model(_) | Self::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            Self::Log(err) => log_kind(err),
            Self::Nav(err) => match err {
                NavError::NodeNotFound { .. } => ErrorKind::NotFound,
                NavError::OutOfScope { .. } => ErrorKind::OutOfScope,
                NavError::AtRoot => ErrorKind::AtRoot,
                NavError::IllegalTransition { .. } => ErrorKind::Internal,
                NavError::Log(err) => log_kind(err),
            },
            Self::Fragment(err) => match err {
                FragmentError::FragmentNotFound { .. } => ErrorKind::FragmentNotFound,
                FragmentError::InvalidTemplate { .. } => ErrorKind::Config,
                FragmentError::Parse(_) => ErrorKind::InvalidDocument,
            },
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::SessionNotFound { .. } => ErrorKind::SessionNotFound,
            Self::InvalidRequest(_) => ErrorKind::InvalidOperation,
            Self::Config(_) => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Offending node id, snapshot name or fragment key
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        match self {
            Self::Model(err) => err.node_id().map(ToString::to_string),
            Self::Log(err) | Self::Nav(NavError::Log(err)) => match err.root_cause() {
                LogError::TargetNotFound { id } | LogError::DuplicateId { id } => Some(id.to_string()),
                LogError::ChildNotFound { child, .. } => Some(child.to_string()),
                LogError::InvalidOperation { target, .. } => Some(target.to_string()),
                LogError::DuplicateSnapshotName { name }
                | LogError::InvalidSnapshotName { name, .. }
                | LogError::SnapshotNotFound { name } => Some(name.clone()),
                _ => None,
            },
            Self::Nav(err) => err.node_id().map(ToString::to_string),
            Self::Fragment(err) => err.key().map(ToString::to_string),
            Self::NotFound { id } => Some(id.to_string()),
            Self::SessionNotFound { id } => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Result alias for service operations
pub type Result<T, E = GenomeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_failure_classified_by_root_cause() {
        let err = GenomeError::from(LogError::ReplayFailed {
            seq: 4,
            source: Box::new(LogError::ChildNotFound {
                parent: NodeId::new("p"),
                child: NodeId::new("c"),
            }),
        });
        assert_eq!(err.kind(), ErrorKind::ChildNotFound);
        assert_eq!(err.subject().as_deref(), Some("c"));
    }

    #[test]
    fn client_errors() {
        assert!(ErrorKind::OutOfScope.is_client_error());
        assert!(ErrorKind::FragmentNotFound.is_client_error());
        assert!(!ErrorKind::IntegrityViolation.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
    }

    #[test]
    fn nav_errors_keep_their_id() {
        let err = GenomeError::from(NavError::OutOfScope {
            id: NodeId::new("x"),
            scope: NodeId::new("s"),
        });
        assert_eq!(err.kind(), ErrorKind::OutOfScope);
        assert_eq!(err.subject().as_deref(), Some("x"));
        assert_eq!(
            serde_json::to_string(&err.kind()).unwrap(),
            "\"out_of_scope\""
        );
    }

    #[test]
    fn load_time_duplicate_is_duplicate_id() {
        let err = GenomeError::from(ModelError::DuplicateId { id: NodeId::new("n") });
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
        assert_eq!(err.subject().as_deref(), Some("n"));
    }
}
