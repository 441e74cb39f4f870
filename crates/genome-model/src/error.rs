//! Error types for the tree model

use crate::id::NodeId;
use crate::level::Level;

/// Errors raised while validating or editing a genome tree
///
/// Every variant that concerns a node names the offending id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Id is empty or otherwise unusable
    #[error("invalid node id '{id}': {reason}")]
    InvalidId {
        /// Rejected id
        id: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Level name not recognised
    #[error("unknown level: '{0}' (expected phase, section, feature or component)")]
    UnknownLevel(String),

    /// Id appears more than once in the tree
    #[error("duplicate node id: {id}")]
    DuplicateId {
        /// Repeated id
        id: NodeId,
    },

    /// Node sits at the wrong tier for its position
    #[error("node '{id}' has level {actual}, expected {expected}")]
    LevelMismatch {
        /// Misplaced node
        id: NodeId,
        /// Level its position requires
        expected: Level,
        /// Level it declares
        actual: Level,
    },

    /// Component node carries children
    #[error("leaf node '{id}' cannot have children")]
    LeafHasChildren {
        /// Component id
        id: NodeId,
    },

    /// Required attribute absent or null
    #[error("node '{id}' ({level}) is missing required attribute '{key}'")]
    MissingAttribute {
        /// Node lacking the key
        id: NodeId,
        /// Its level
        level: Level,
        /// Required key
        key: String,
    },

    /// Attribute key collides with a structural field
    #[error("node '{id}' uses reserved attribute key '{key}'")]
    ReservedAttribute {
        /// Offending node
        id: NodeId,
        /// Reserved key
        key: String,
    },

    /// Attribute present but malformed
    #[error("node '{id}' attribute '{key}' {reason}")]
    InvalidAttribute {
        /// Offending node
        id: NodeId,
        /// Attribute key
        key: String,
        /// What is wrong with the value
        reason: String,
    },

    /// Genome metadata out of range
    #[error("invalid genome metadata: {0}")]
    InvalidMetadata(String),

    /// Lookup by id failed
    #[error("node not found: {id}")]
    NodeNotFound {
        /// Missing id
        id: NodeId,
    },

    /// Child id absent under the given parent
    #[error("child '{child}' not found under '{parent}'")]
    ChildNotFound {
        /// Node searched
        parent: NodeId,
        /// Absent child
        child: NodeId,
    },

    /// Edit is structurally impossible for its target
    #[error("invalid edit on '{id}': {reason}")]
    InvalidEdit {
        /// Edit target
        id: NodeId,
        /// Why it cannot apply
        reason: String,
    },
}

impl ModelError {
    /// Id of the node the error is about, if any
    #[must_use]
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::DuplicateId { id }
            | Self::LevelMismatch { id, .. }
            | Self::LeafHasChildren { id }
            | Self::MissingAttribute { id, .. }
            | Self::ReservedAttribute { id, .. }
            | Self::InvalidAttribute { id, .. }
            | Self::NodeNotFound { id }
            | Self::InvalidEdit { id, .. } => Some(id),
            Self::ChildNotFound { child, .. } => Some(child),
            Self::InvalidId { .. } | Self::UnknownLevel(_) | Self::InvalidMetadata(_) => None,
        }
    }
}
