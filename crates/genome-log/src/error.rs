//! Error types for the modification log

use crate::operation::OperationKind;
use genome_model::{ModelError, NodeId};

/// Errors from appending, replaying or snapshotting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LogError {
    /// Edit target absent from the current effective tree
    #[error("target not found: {id}")]
    TargetNotFound {
        /// Missing target
        id: NodeId,
    },

    /// Remove-child named a child that is not there
    #[error("child '{child}' not found under '{parent}'")]
    ChildNotFound {
        /// Edit target
        parent: NodeId,
        /// Absent child
        child: NodeId,
    },

    /// Edit would introduce an id that already exists
    #[error("duplicate node id: {id}")]
    DuplicateId {
        /// Id already in the tree
        id: NodeId,
    },

    /// Edit is well-formed but cannot apply to its target
    #[error("invalid operation on '{target}': {reason}")]
    InvalidOperation {
        /// Edit target
        target: NodeId,
        /// Why it cannot apply
        reason: String,
    },

    /// Payload does not have the shape its kind requires
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload {
        /// Declared kind
        kind: OperationKind,
        /// Decoder message
        reason: String,
    },

    /// Snapshot name used before, even if since retired
    #[error("snapshot name already in use: {name}")]
    DuplicateSnapshotName {
        /// Name already used
        name: String,
    },

    /// Snapshot name unusable
    #[error("invalid snapshot name '{name}': {reason}")]
    InvalidSnapshotName {
        /// Rejected name
        name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// No retained snapshot has this name
    #[error("snapshot not found: {name}")]
    SnapshotNotFound {
        /// Requested name
        name: String,
    },

    /// Requested sequence number is past the log head
    #[error("sequence {requested} is beyond log head {head}")]
    SequenceOutOfRange {
        /// Requested position
        requested: u64,
        /// Current head
        head: u64,
    },

    /// A logged record no longer applies during replay
    #[error("replay failed at seq {seq}: {source}")]
    ReplayFailed {
        /// Record that failed
        seq: u64,
        /// Underlying failure
        #[source]
        source: Box<LogError>,
    },

    /// Record chain is broken
    #[error("log integrity violation at seq {seq}: {reason}")]
    IntegrityViolation {
        /// First bad record
        seq: u64,
        /// Mismatch found
        reason: String,
    },

    /// Record could not be encoded for hashing
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LogError {
    /// Translate a model error raised while applying an edit to `target`
    #[must_use]
    pub fn from_model(target: &NodeId, err: ModelError) -> Self {
        match err {
            ModelError::NodeNotFound { id } => Self::TargetNotFound { id },
            ModelError::ChildNotFound { parent, child } => Self::ChildNotFound { parent, child },
            ModelError::DuplicateId { id } => Self::DuplicateId { id },
            other => Self::InvalidOperation {
                target: target.clone(),
                reason: other.to_string(),
            },
        }
    }

    /// The error beneath any replay wrapping
    #[must_use]
    pub fn root_cause(&self) -> &LogError {
        let mut current = self;
        while let Self::ReplayFailed { source, .. } = current {
            current = source;
        }
        current
    }
}
