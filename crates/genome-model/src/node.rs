//! Genome nodes

use crate::id::NodeId;
use crate::level::Level;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One entry in the genome tree
///
/// Only non-leaf levels carry children. The attribute map is open-ended
/// and validated against a [`LevelSchema`](crate::LevelSchema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    /// Globally unique id
    pub id: NodeId,

    /// Tier of this node
    pub level: Level,

    /// Human-readable label
    pub label: String,

    /// Ordered children, one level below `level`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Level-specific attributes (endpoint, method, `ui_hint`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Node {
    /// Create childless node without attributes
    #[must_use]
    pub fn new(id: impl Into<NodeId>, level: Level, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            label: label.into(),
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add attribute, returning self
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append child, returning self
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value by key
    #[inline]
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String value of the `ui_hint` attribute
    #[inline]
    #[must_use]
    pub fn ui_hint(&self) -> Option<&str> {
        self.attribute(crate::UI_HINT_KEY).and_then(Value::as_str)
    }

    /// Whether this node has no children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child by id
    #[must_use]
    pub fn child(&self, id: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Depth-first, pre-order walk of this node and all descendants
    #[inline]
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(std::slice::from_ref(self))
    }

    /// Number of nodes in this subtree, self included
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        self.descendants().count()
    }
}

/// Pre-order iterator over a forest of nodes
///
/// Children are visited in stored order.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
