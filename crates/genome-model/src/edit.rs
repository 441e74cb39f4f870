//! Structural edits on an owned genome
//!
//! Each edit validates before it mutates, so a failed edit leaves the
//! genome untouched. Shared genomes are never edited in place; callers
//! edit their own copy.

use crate::error::ModelError;
use crate::genome::{check_subtree, Genome};
use crate::id::NodeId;
use crate::level::{LevelSchema, RESERVED_KEYS};
use crate::node::Node;
use crate::LABEL_KEY;
use serde_json::Value;
use std::collections::HashSet;

impl Genome {
    /// Upsert one attribute on `target`
    ///
    /// The key `label` updates [`Node::label`] and requires a string value.
    /// Other attributes are left as they are.
    ///
    /// # Errors
    /// `NodeNotFound`, `ReservedAttribute`, `InvalidAttribute`, or a schema
    /// violation caused by the new value
    pub fn set_attribute(
        &mut self,
        target: &NodeId,
        key: &str,
        value: Value,
        schema: &LevelSchema,
    ) -> Result<(), ModelError> {
        let location = self.locate(target.as_str()).ok_or_else(|| not_found(target))?;
        let node = self
            .node_at_mut(&location)
            .ok_or_else(|| not_found(target))?;

        if key.is_empty() {
            return Err(ModelError::InvalidEdit {
                id: target.clone(),
                reason: "attribute key is empty".to_string(),
            });
        }

        if key == LABEL_KEY {
            let Value::String(label) = value else {
                return Err(ModelError::InvalidAttribute {
                    id: target.clone(),
                    key: LABEL_KEY.to_string(),
                    reason: "must be a string".to_string(),
                });
            };
            node.label = label;
            return Ok(());
        }

        if RESERVED_KEYS.contains(&key) {
            return Err(ModelError::ReservedAttribute {
                id: target.clone(),
                key: key.to_string(),
            });
        }

        let mut attributes = node.attributes.clone();
        attributes.insert(key.to_string(), value);
        let candidate = Node {
            id: node.id.clone(),
            level: node.level,
            label: String::new(),
            children: Vec::new(),
            attributes,
        };
        schema.check_node(&candidate)?;

        node.attributes = candidate.attributes;
        Ok(())
    }

    /// Append `child` to the children of `target`
    ///
    /// # Errors
    /// `NodeNotFound`, `InvalidEdit` on a leaf target, `LevelMismatch`,
    /// `DuplicateId` if any id in `child` already exists, or a schema
    /// violation inside `child`
    pub fn add_child(
        &mut self,
        target: &NodeId,
        child: Node,
        schema: &LevelSchema,
    ) -> Result<(), ModelError> {
        let location = self.locate(target.as_str()).ok_or_else(|| not_found(target))?;
        {
            let parent = self.node_at(&location).ok_or_else(|| not_found(target))?;
            let Some(child_level) = parent.level.child() else {
                return Err(ModelError::InvalidEdit {
                    id: target.clone(),
                    reason: format!("{} nodes cannot have children", parent.level),
                });
            };

            let mut seen: HashSet<&str> = self.ids().map(NodeId::as_str).collect();
            check_subtree(&child, child_level, schema, &mut seen)?;
        }

        let parent = self
            .node_at_mut(&location)
            .ok_or_else(|| not_found(target))?;
        parent.children.push(child);
        Ok(())
    }

    /// Remove the direct child `child_id` from `target`, returning it
    ///
    /// # Errors
    /// `NodeNotFound` for the target, `ChildNotFound` if `child_id` is not
    /// a direct child
    pub fn remove_child(&mut self, target: &NodeId, child_id: &NodeId) -> Result<Node, ModelError> {
        let location = self.locate(target.as_str()).ok_or_else(|| not_found(target))?;
        let parent = self
            .node_at_mut(&location)
            .ok_or_else(|| not_found(target))?;
        let position = parent
            .children
            .iter()
            .position(|c| c.id == *child_id)
            .ok_or_else(|| ModelError::ChildNotFound {
                parent: target.clone(),
                child: child_id.clone(),
            })?;
        Ok(parent.children.remove(position))
    }

    /// Substitute the whole subtree at `target`, returning the old one
    ///
    /// The replacement must keep the target's id and level. Ids inside the
    /// replacement may reuse ids of the old subtree but nothing else.
    ///
    /// # Errors
    /// `NodeNotFound`, `InvalidEdit` on an id change, `LevelMismatch`,
    /// `DuplicateId`, or a schema violation inside the replacement
    pub fn replace_subtree(
        &mut self,
        target: &NodeId,
        replacement: Node,
        schema: &LevelSchema,
    ) -> Result<Node, ModelError> {
        let location = self.locate(target.as_str()).ok_or_else(|| not_found(target))?;
        {
            let current = self.node_at(&location).ok_or_else(|| not_found(target))?;

            if replacement.id != *target {
                return Err(ModelError::InvalidEdit {
                    id: target.clone(),
                    reason: format!("replacement changes id to '{}'", replacement.id),
                });
            }

            let replaced: HashSet<&str> = current.descendants().map(|n| n.id.as_str()).collect();
            let mut seen: HashSet<&str> = self
                .ids()
                .map(NodeId::as_str)
                .filter(|id| !replaced.contains(id))
                .collect();
            check_subtree(&replacement, current.level, schema, &mut seen)?;
        }

        let slot = self
            .node_at_mut(&location)
            .ok_or_else(|| not_found(target))?;
        Ok(std::mem::replace(slot, replacement))
    }
}

fn not_found(id: &NodeId) -> ModelError {
    ModelError::NodeNotFound { id: id.clone() }
}
