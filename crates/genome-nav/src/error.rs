//! Navigation errors

use crate::state_machine::NavState;
use genome_log::LogError;
use genome_model::NodeId;
use thiserror::Error;

/// Errors from drill-down navigation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// Id absent from the latest effective tree
    #[error("node not found: {id}")]
    NodeNotFound {
        /// Missing id
        id: NodeId,
    },

    /// Id exists but not under the current scope
    #[error("node {id} is outside the current scope {scope}")]
    OutOfScope {
        /// Requested id
        id: NodeId,
        /// Current scope
        scope: NodeId,
    },

    /// Exit with nothing pushed
    #[error("already at root")]
    AtRoot,

    /// Transition not in the allowed table
    #[error("illegal navigation transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// State before
        from: NavState,
        /// Requested state
        to: NavState,
    },

    /// Effective tree could not be materialized
    #[error(transparent)]
    Log(#[from] LogError),
}

impl NavError {
    /// Offending id, if any
    #[must_use]
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::NodeNotFound { id } | Self::OutOfScope { id, .. } => Some(id),
            _ => None,
        }
    }
}
