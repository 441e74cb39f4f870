//! What a consumer is currently looking at: the whole tree or one pruned subtree

use crate::genome::Genome;
use crate::id::NodeId;
use crate::node::{Descendants, Node};
use serde::Serialize;
use std::sync::Arc;

/// Whole genome or a single pruned subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", content = "tree", rename_all = "snake_case")]
pub enum ScopeView {
    /// No scope pushed: the entire effective tree
    Root(Arc<Genome>),
    /// Isolated subtree rooted at the scope node
    Node(Node),
}

impl ScopeView {
    /// Id of the scope node, `None` at root
    #[must_use]
    pub fn scope_id(&self) -> Option<&NodeId> {
        match self {
            Self::Root(_) => None,
            Self::Node(node) => Some(&node.id),
        }
    }

    /// Whether this is the whole tree
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root(_))
    }

    /// Every node in view, pre-order
    #[must_use]
    pub fn nodes(&self) -> Descendants<'_> {
        match self {
            Self::Root(genome) => genome.nodes(),
            Self::Node(node) => Descendants::new(std::slice::from_ref(node)),
        }
    }

    /// Number of nodes in view
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Root(genome) => genome.len(),
            Self::Node(node) => node.subtree_len(),
        }
    }

    /// Whether nothing is in view
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenomeMeta, Level, LevelSchema};

    fn genome() -> Genome {
        let phase = Node::new("p", Level::Phase, "P")
            .with_child(Node::new("s1", Level::Section, "S1"))
            .with_child(Node::new("s2", Level::Section, "S2"));
        Genome::from_phases(GenomeMeta::default(), vec![phase], &LevelSchema::permissive()).unwrap()
    }

    #[test]
    fn node_view_includes_its_root() {
        let g = genome();
        let view = ScopeView::Node(g.find("p").unwrap().clone());
        let ids: Vec<_> = view.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["p", "s1", "s2"]);
        assert_eq!(view.scope_id().unwrap().as_str(), "p");
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn root_view_covers_all_phases() {
        let view = ScopeView::Root(Arc::new(genome()));
        assert!(view.is_root());
        assert!(view.scope_id().is_none());
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn serializes_tagged() {
        let view = ScopeView::Node(Node::new("s1", Level::Section, "S1"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["scope"], "node");
        assert_eq!(json["tree"]["id"], "s1");
    }
}
