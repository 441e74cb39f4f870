//! Navigator states and the allowed-transition table

use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a scope is pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    /// Empty stack, whole tree in view
    Root,
    /// At least one scope pushed
    Scoped,
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Scoped => f.write_str("scoped"),
        }
    }
}

/// Check a transition against [`allowed_transitions`]
///
/// # Errors
/// Returns [`NavError::IllegalTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: NavState, to: NavState) -> Result<(), NavError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(NavError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: NavState) -> &'static [NavState] {
    use NavState::{Root, Scoped};
    match from {
        Root => &[Scoped],
        Scoped => &[Scoped, Root],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        assert!(validate_transition(NavState::Root, NavState::Scoped).is_ok());
        assert!(validate_transition(NavState::Scoped, NavState::Scoped).is_ok());
        assert!(validate_transition(NavState::Scoped, NavState::Root).is_ok());
        assert_eq!(
            validate_transition(NavState::Root, NavState::Root),
            Err(NavError::IllegalTransition {
                from: NavState::Root,
                to: NavState::Root
            })
        );
    }
}
