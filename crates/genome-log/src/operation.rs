//! Edit operations
//!
//! Structural operations on one target node. Not text patches: each
//! operation has a fixed payload shape and is re-validated against the
//! level schema whenever it is applied.

use crate::error::LogError;
use genome_model::{Genome, LevelSchema, Node, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Operation kinds as named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Key-level upsert into the attribute map
    SetAttribute,
    /// Append a child
    AddChild,
    /// Remove a direct child by id
    RemoveChild,
    /// Replace the whole target subtree
    ReplaceSubtree,
}

impl OperationKind {
    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetAttribute => "set_attribute",
            Self::AddChild => "add_child",
            Self::RemoveChild => "remove_child",
            Self::ReplaceSubtree => "replace_subtree",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edit against a target node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Operation {
    /// Upsert `key` → `value`; `label` updates the node label
    SetAttribute { key: String, value: Value },

    /// Append `child`, one level below the target
    AddChild { child: Node },

    /// Remove the direct child `child_id`
    RemoveChild { child_id: NodeId },

    /// Replace the target with `node`, which keeps the target's id
    ReplaceSubtree { node: Node },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetAttributePayload {
    key: String,
    value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AddChildPayload {
    child: Node,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RemoveChildPayload {
    child_id: NodeId,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplaceSubtreePayload {
    node: Node,
}

impl Operation {
    /// Set-attribute operation
    #[must_use]
    pub fn set_attribute(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::SetAttribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Add-child operation
    #[must_use]
    pub fn add_child(child: Node) -> Self {
        Self::AddChild { child }
    }

    /// Remove-child operation
    #[must_use]
    pub fn remove_child(child_id: impl Into<NodeId>) -> Self {
        Self::RemoveChild {
            child_id: child_id.into(),
        }
    }

    /// Replace-subtree operation
    #[must_use]
    pub fn replace_subtree(node: Node) -> Self {
        Self::ReplaceSubtree { node }
    }

    /// Build an operation from a kind and an untyped payload
    ///
    /// # Errors
    /// Returns [`LogError::MalformedPayload`] if the payload does not match
    /// the shape required by `kind`
    pub fn from_payload(kind: OperationKind, payload: Value) -> Result<Self, LogError> {
        let malformed = |e: serde_json::Error| LogError::MalformedPayload {
            kind,
            reason: e.to_string(),
        };

        let op = match kind {
            OperationKind::SetAttribute => {
                let p: SetAttributePayload = serde_json::from_value(payload).map_err(malformed)?;
                Self::SetAttribute {
                    key: p.key,
                    value: p.value,
                }
            }
            OperationKind::AddChild => {
                let p: AddChildPayload = serde_json::from_value(payload).map_err(malformed)?;
                Self::AddChild { child: p.child }
            }
            OperationKind::RemoveChild => {
                let p: RemoveChildPayload = serde_json::from_value(payload).map_err(malformed)?;
                Self::RemoveChild {
                    child_id: p.child_id,
                }
            }
            OperationKind::ReplaceSubtree => {
                let p: ReplaceSubtreePayload =
                    serde_json::from_value(payload).map_err(malformed)?;
                Self::ReplaceSubtree { node: p.node }
            }
        };
        Ok(op)
    }

    /// Operation kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SetAttribute { .. } => OperationKind::SetAttribute,
            Self::AddChild { .. } => OperationKind::AddChild,
            Self::RemoveChild { .. } => OperationKind::RemoveChild,
            Self::ReplaceSubtree { .. } => OperationKind::ReplaceSubtree,
        }
    }

    /// Apply to an owned genome
    ///
    /// On error the genome is unchanged.
    ///
    /// # Errors
    /// Any [`LogError`] describing why the edit cannot apply
    pub fn apply(
        &self,
        genome: &mut Genome,
        target: &NodeId,
        schema: &LevelSchema,
    ) -> Result<(), LogError> {
        let result = match self {
            Self::SetAttribute { key, value } => {
                genome.set_attribute(target, key, value.clone(), schema)
            }
            Self::AddChild { child } => genome.add_child(target, child.clone(), schema),
            Self::RemoveChild { child_id } => genome.remove_child(target, child_id).map(drop),
            Self::ReplaceSubtree { node } => {
                genome.replace_subtree(target, node.clone(), schema).map(drop)
            }
        };
        result.map_err(|e| LogError::from_model(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genome_model::{GenomeMeta, Level};
    use serde_json::json;

    fn genome() -> Genome {
        let phases = vec![Node::new("p", Level::Phase, "P")
            .with_child(Node::new("s", Level::Section, "S"))];
        Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::default()).unwrap()
    }

    #[test]
    fn from_payload_builds_each_kind() {
        let op = Operation::from_payload(
            OperationKind::SetAttribute,
            json!({"key": "label", "value": "New"}),
        )
        .unwrap();
        assert_eq!(op, Operation::set_attribute("label", "New"));

        let op = Operation::from_payload(
            OperationKind::RemoveChild,
            json!({"child_id": "s"}),
        )
        .unwrap();
        assert_eq!(op.kind(), OperationKind::RemoveChild);

        let op = Operation::from_payload(
            OperationKind::AddChild,
            json!({"child": {"id": "s2", "level": "section", "label": "S2"}}),
        )
        .unwrap();
        assert_eq!(op.kind(), OperationKind::AddChild);
    }

    #[test]
    fn from_payload_rejects_wrong_shape() {
        let err = Operation::from_payload(OperationKind::AddChild, json!({"child_id": "x"}))
            .unwrap_err();
        assert!(matches!(
            err,
            LogError::MalformedPayload { kind: OperationKind::AddChild, .. }
        ));

        let err = Operation::from_payload(
            OperationKind::ReplaceSubtree,
            json!({"node": {"id": "s", "level": "tier", "label": "S"}}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("tier"));
    }

    #[test]
    fn serde_uses_kind_and_payload() {
        let op = Operation::remove_child("s");
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value, json!({"kind": "remove_child", "payload": {"child_id": "s"}}));
        let back: Operation = serde_json::from_value(value).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn apply_maps_model_errors() {
        let mut g = genome();
        let err = Operation::remove_child("ghost")
            .apply(&mut g, &NodeId::new("p"), &LevelSchema::default())
            .unwrap_err();
        assert!(matches!(err, LogError::ChildNotFound { .. }));

        let err = Operation::set_attribute("x", 1)
            .apply(&mut g, &NodeId::new("ghost"), &LevelSchema::default())
            .unwrap_err();
        assert_eq!(err, LogError::TargetNotFound { id: NodeId::new("ghost") });
    }

    #[test]
    fn apply_add_child_requires_next_level() {
        let mut g = genome();
        let err = Operation::add_child(Node::new("p2", Level::Phase, "P2"))
            .apply(&mut g, &NodeId::new("p"), &LevelSchema::default())
            .unwrap_err();
        assert!(matches!(err, LogError::InvalidOperation { .. }));
    }
}
