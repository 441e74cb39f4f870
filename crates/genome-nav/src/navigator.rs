//! Drill-down navigator
//!
//! Holds a stack of scope ids only. Every read re-resolves those ids
//! against the latest effective tree, so edits appended after `enter` are
//! visible on the next call and a removed scope surfaces as
//! [`NavError::NodeNotFound`] rather than a stale copy, until `exit` or
//! `reset` moves past it.

use crate::error::NavError;
use crate::state_machine::{validate_transition, NavState};
use genome_log::{AsOf, StateManager};
use genome_model::{is_strict_descendant, prune, prune_node, Genome, Node, NodeId, ScopeView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Scope id
    pub id: NodeId,
    /// Label in the latest tree
    pub label: String,
}

/// Stack-based navigator over a [`StateManager`]
#[derive(Debug, Clone)]
pub struct DrillDown {
    state: Arc<StateManager>,
    stack: Vec<NodeId>,
}

impl DrillDown {
    /// Navigator at root
    #[must_use]
    pub fn new(state: Arc<StateManager>) -> Self {
        Self {
            state,
            stack: Vec::new(),
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> NavState {
        if self.stack.is_empty() {
            NavState::Root
        } else {
            NavState::Scoped
        }
    }

    /// Number of pushed scopes
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushed scope ids, outermost first
    #[inline]
    #[must_use]
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    /// Underlying state manager
    #[inline]
    #[must_use]
    pub fn state_manager(&self) -> &Arc<StateManager> {
        &self.state
    }

    fn latest(&self) -> Result<Arc<Genome>, NavError> {
        Ok(self.state.effective_tree(AsOf::Latest)?)
    }

    fn resolve(tree: &Genome, id: &NodeId) -> Result<Node, NavError> {
        prune(tree, id.as_str()).ok_or_else(|| NavError::NodeNotFound { id: id.clone() })
    }

    fn view(&self, tree: Arc<Genome>) -> Result<ScopeView, NavError> {
        match self.stack.last() {
            None => Ok(ScopeView::Root(tree)),
            Some(top) => Ok(ScopeView::Node(Self::resolve(&tree, top)?)),
        }
    }

    /// Narrow the scope to `id` and return its subtree
    ///
    /// At root any id in the tree may be entered. Once scoped, `id` must be
    /// a strict descendant of the current scope.
    ///
    /// # Errors
    /// - `NodeNotFound` if `id` (or the current scope) no longer exists
    /// - `OutOfScope` if `id` exists outside the current scope
    pub fn enter(&mut self, id: &NodeId) -> Result<Node, NavError> {
        let tree = self.latest()?;

        let node = match self.stack.last() {
            None => Self::resolve(&tree, id)?,
            Some(top) => {
                let scope = Self::resolve(&tree, top)?;
                if !is_strict_descendant(&scope, id.as_str()) {
                    if tree.contains(id.as_str()) {
                        tracing::warn!(id = %id, scope = %top, "enter rejected: out of scope");
                        return Err(NavError::OutOfScope {
                            id: id.clone(),
                            scope: top.clone(),
                        });
                    }
                    return Err(NavError::NodeNotFound { id: id.clone() });
                }
                prune_node(&scope, id.as_str())
                    .ok_or_else(|| NavError::NodeNotFound { id: id.clone() })?
            }
        };

        validate_transition(self.state(), NavState::Scoped)?;
        self.stack.push(id.clone());
        tracing::debug!(id = %id, depth = self.stack.len(), "scope entered");
        Ok(node)
    }

    /// Pop the innermost scope and return the new view
    ///
    /// Enclosing scopes removed since they were entered are popped as well,
    /// so the view is the nearest scope that still exists, or the root.
    ///
    /// # Errors
    /// `AtRoot` with nothing pushed
    pub fn exit(&mut self) -> Result<ScopeView, NavError> {
        let from = self.state();
        let Some((popped, enclosing)) = self.stack.split_last() else {
            return Err(NavError::AtRoot);
        };
        let popped = popped.clone();
        let tree = self.latest()?;

        let keep = enclosing
            .iter()
            .rposition(|id| tree.contains(id.as_str()))
            .map_or(0, |i| i + 1);
        let to = if keep == 0 { NavState::Root } else { NavState::Scoped };
        validate_transition(from, to)?;

        let stale = enclosing.len() - keep;
        self.stack.truncate(keep);
        if stale > 0 {
            tracing::warn!(stale, "removed scopes dropped on exit");
        }
        tracing::debug!(id = %popped, depth = keep, "scope exited");
        self.view(tree)
    }

    /// `{id, label}` for every pushed scope, outermost first
    ///
    /// # Errors
    /// `NodeNotFound` for a scope removed since it was entered
    pub fn breadcrumb(&self) -> Result<Vec<Crumb>, NavError> {
        let tree = self.latest()?;
        self.stack
            .iter()
            .map(|id| {
                tree.find(id.as_str())
                    .map(|node| Crumb {
                        id: id.clone(),
                        label: node.label.clone(),
                    })
                    .ok_or_else(|| NavError::NodeNotFound { id: id.clone() })
            })
            .collect()
    }

    /// Whole tree at root, otherwise a fresh prune of the innermost scope
    ///
    /// # Errors
    /// `NodeNotFound` if the innermost scope no longer exists
    pub fn current_scope(&self) -> Result<ScopeView, NavError> {
        let tree = self.latest()?;
        self.view(tree)
    }

    /// Drop every pushed scope
    pub fn reset(&mut self) {
        if !self.stack.is_empty() {
            self.stack.clear();
            tracing::debug!("navigator reset");
        }
    }
}
