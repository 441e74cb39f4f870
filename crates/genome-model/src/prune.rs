//! Pruning engine
//!
//! Locates a node by id and extracts it, with its descendants, as a
//! standalone subtree. Search is depth-first: each phase in order, a node
//! before its children, children in stored order. Results are deep copies,
//! so later edits to the source tree never show through a pruned slice.

use crate::genome::Genome;
use crate::node::Node;

/// First node with `id` in a pre-order walk of `roots`
///
/// Ids are unique, so "first" is "only".
pub(crate) fn search<'a>(roots: &'a [Node], id: &str) -> Option<&'a Node> {
    let mut stack: Vec<&Node> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Extract the subtree rooted at `id`
///
/// `None` means the id exists nowhere in the tree. A node without children
/// is a valid positive result.
#[must_use]
pub fn prune(genome: &Genome, id: &str) -> Option<Node> {
    let found = genome.find(id).cloned();
    tracing::trace!(target_id = id, found = found.is_some(), "prune");
    found
}

/// Extract the subtree rooted at `id`, searching only under `scope`
///
/// `scope` itself is a candidate.
#[must_use]
pub fn prune_node(scope: &Node, id: &str) -> Option<Node> {
    search(std::slice::from_ref(scope), id).cloned()
}

/// Whether `id` is `scope` or one of its descendants
#[inline]
#[must_use]
pub fn contains(scope: &Node, id: &str) -> bool {
    search(std::slice::from_ref(scope), id).is_some()
}

/// Whether `id` is a descendant of `scope`, excluding `scope` itself
#[inline]
#[must_use]
pub fn is_strict_descendant(scope: &Node, id: &str) -> bool {
    search(&scope.children, id).is_some()
}
