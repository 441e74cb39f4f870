//! Genome levels and per-level attribute schemas
//!
//! Each node belongs to one of four ordered tiers. The attribute map of a
//! node is open-ended, but every level names the keys it must carry.

use crate::error::ModelError;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Attribute keys that collide with structural node fields
pub const RESERVED_KEYS: [&str; 4] = ["id", "level", "label", "children"];

/// The four ordered tiers of a genome
///
/// `Phase` (L0) is the root tier, `Component` (L3) the leaf tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// L0
    #[serde(alias = "L0")]
    Phase,

    /// L1
    #[serde(alias = "L1")]
    Section,

    /// L2
    #[serde(alias = "L2")]
    Feature,

    /// L3, never has children
    #[serde(alias = "L3")]
    Component,
}

impl Level {
    /// Nesting depth (0 for phases)
    #[inline]
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Self::Phase => 0,
            Self::Section => 1,
            Self::Feature => 2,
            Self::Component => 3,
        }
    }

    /// Level of this level's children
    #[inline]
    #[must_use]
    pub const fn child(self) -> Option<Level> {
        match self {
            Self::Phase => Some(Self::Section),
            Self::Section => Some(Self::Feature),
            Self::Feature => Some(Self::Component),
            Self::Component => None,
        }
    }

    /// Level of this level's parent
    #[inline]
    #[must_use]
    pub const fn parent(self) -> Option<Level> {
        match self {
            Self::Phase => None,
            Self::Section => Some(Self::Phase),
            Self::Feature => Some(Self::Section),
            Self::Component => Some(Self::Feature),
        }
    }

    /// Whether nodes of this level are leaves
    #[inline]
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Component)
    }

    /// Canonical name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Section => "section",
            Self::Feature => "feature",
            Self::Component => "component",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phase" | "L0" => Ok(Self::Phase),
            "section" | "L1" => Ok(Self::Section),
            "feature" | "L2" => Ok(Self::Feature),
            "component" | "L3" => Ok(Self::Component),
            other => Err(ModelError::UnknownLevel(other.to_string())),
        }
    }
}

/// Required attribute keys per level
///
/// Checked once when a genome is loaded and again after every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelSchema {
    /// Keys every phase must carry
    pub phase: Vec<String>,
    /// Keys every section must carry
    pub section: Vec<String>,
    /// Keys every feature must carry
    pub feature: Vec<String>,
    /// Keys every component must carry
    pub component: Vec<String>,
}

impl Default for LevelSchema {
    fn default() -> Self {
        Self {
            phase: Vec::new(),
            section: Vec::new(),
            feature: vec!["endpoint".to_string(), "method".to_string()],
            component: vec![crate::UI_HINT_KEY.to_string()],
        }
    }
}

impl LevelSchema {
    /// Schema without any required keys
    #[inline]
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            phase: Vec::new(),
            section: Vec::new(),
            feature: Vec::new(),
            component: Vec::new(),
        }
    }

    /// Replace the required keys of one level
    #[must_use]
    pub fn with_required<I, S>(mut self, level: Level, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into).collect();
        match level {
            Level::Phase => self.phase = keys,
            Level::Section => self.section = keys,
            Level::Feature => self.feature = keys,
            Level::Component => self.component = keys,
        }
        self
    }

    /// Required keys for a level
    #[inline]
    #[must_use]
    pub fn required(&self, level: Level) -> &[String] {
        match level {
            Level::Phase => &self.phase,
            Level::Section => &self.section,
            Level::Feature => &self.feature,
            Level::Component => &self.component,
        }
    }

    /// Check one node's own attributes (children are not visited)
    ///
    /// # Errors
    /// Returns the first reserved key, missing/null required key, or a
    /// non-string `ui_hint`
    pub fn check_node(&self, node: &Node) -> Result<(), ModelError> {
        if let Some(key) = RESERVED_KEYS
            .iter()
            .find(|key| node.attributes.contains_key(**key))
        {
            return Err(ModelError::ReservedAttribute {
                id: node.id.clone(),
                key: (*key).to_string(),
            });
        }

        for key in self.required(node.level) {
            match node.attributes.get(key) {
                Some(value) if !value.is_null() => {}
                _ => {
                    return Err(ModelError::MissingAttribute {
                        id: node.id.clone(),
                        level: node.level,
                        key: key.clone(),
                    })
                }
            }
        }

        if let Some(hint) = node.attributes.get(crate::UI_HINT_KEY) {
            if !hint.is_string() && !hint.is_null() {
                return Err(ModelError::InvalidAttribute {
                    id: node.id.clone(),
                    key: crate::UI_HINT_KEY.to_string(),
                    reason: "must be a string".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_and_links() {
        assert!(Level::Phase < Level::Component);
        assert_eq!(Level::Phase.child(), Some(Level::Section));
        assert_eq!(Level::Component.child(), None);
        assert_eq!(Level::Section.parent(), Some(Level::Phase));
        assert!(Level::Component.is_leaf());
        assert_eq!(Level::Feature.depth(), 2);
    }

    #[test]
    fn level_parses_names_and_aliases() {
        assert_eq!("feature".parse::<Level>().unwrap(), Level::Feature);
        assert_eq!("L3".parse::<Level>().unwrap(), Level::Component);
        assert!(matches!(
            "module".parse::<Level>(),
            Err(ModelError::UnknownLevel(name)) if name == "module"
        ));
    }

    #[test]
    fn level_serde_accepts_alias() {
        let level: Level = serde_json::from_str("\"L1\"").unwrap();
        assert_eq!(level, Level::Section);
        assert_eq!(serde_json::to_string(&Level::Section).unwrap(), "\"section\"");

        let err = serde_json::from_str::<Level>("\"tier\"").unwrap_err();
        assert!(err.to_string().contains("tier"));
    }

    #[test]
    fn schema_requires_feature_keys() {
        let schema = LevelSchema::default();
        let node = Node::new("f", Level::Feature, "F").with_attribute("endpoint", "/x");
        assert!(matches!(
            schema.check_node(&node),
            Err(ModelError::MissingAttribute { key, .. }) if key == "method"
        ));

        let node = node.with_attribute("method", "POST");
        assert!(schema.check_node(&node).is_ok());
    }

    #[test]
    fn schema_treats_null_as_missing() {
        let schema = LevelSchema::default();
        let node = Node::new("c", Level::Component, "C")
            .with_attribute("ui_hint", serde_json::Value::Null);
        assert!(matches!(
            schema.check_node(&node),
            Err(ModelError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn schema_rejects_reserved_key() {
        let node = Node::new("p", Level::Phase, "P").with_attribute("children", 1);
        assert!(matches!(
            LevelSchema::permissive().check_node(&node),
            Err(ModelError::ReservedAttribute { key, .. }) if key == "children"
        ));
    }

    #[test]
    fn schema_with_required_overrides_level() {
        let schema = LevelSchema::permissive().with_required(Level::Phase, ["owner"]);
        assert_eq!(schema.required(Level::Phase), ["owner".to_string()]);
        assert!(schema.required(Level::Feature).is_empty());
    }
}
