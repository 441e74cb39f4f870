//! Node identifiers

use crate::error::ModelError;
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Globally unique node identifier
///
/// Unique across the entire genome regardless of depth, so lookup never
/// needs the level in advance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create id without validation
    ///
    /// Ids are checked when the containing tree is validated.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create id, rejecting empty or whitespace-padded values
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidId`] if the value is not a usable id
    pub fn parse(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = Self(id.into());
        id.check()?;
        Ok(id)
    }

    /// Get id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn check(&self) -> Result<(), ModelError> {
        let reason = if self.0.is_empty() {
            "empty"
        } else if self.0.trim() != self.0 {
            "leading or trailing whitespace"
        } else {
            return Ok(());
        };
        Err(ModelError::InvalidId {
            id: self.0.clone(),
            reason,
        })
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
