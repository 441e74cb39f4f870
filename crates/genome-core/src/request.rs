//! Request and response types
//!
//! Plain serde structs so a transport layer can decode straight into them.

use crate::error::Result;
use chrono::{DateTime, Utc};
use genome_log::{ModificationRecord, Operation, OperationKind, SnapshotDescriptor};
use genome_model::{GenomeHash, NodeId, ScopeView};
use genome_nav::Crumb;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Append one edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditRequest {
    /// Node the edit applies to
    pub target_id: NodeId,
    /// Which operation
    pub operation_kind: OperationKind,
    /// Kind-specific payload
    #[serde(default)]
    pub payload: Value,
}

impl EditRequest {
    /// Request from an already-built operation
    ///
    /// # Errors
    /// Fails only if the operation cannot be encoded
    pub fn new(target_id: impl Into<NodeId>, operation: &Operation) -> Result<Self> {
        let mut encoded = serde_json::to_value(operation)
            .map_err(|e| crate::GenomeError::InvalidRequest(e.to_string()))?;
        let payload = encoded
            .get_mut("payload")
            .map(Value::take)
            .unwrap_or(Value::Null);
        Ok(Self {
            target_id: target_id.into(),
            operation_kind: operation.kind(),
            payload,
        })
    }

    /// Decode the payload for its kind
    ///
    /// # Errors
    /// `MalformedPayload` if the payload does not fit the kind
    pub fn operation(&self) -> Result<Operation> {
        Ok(Operation::from_payload(
            self.operation_kind,
            self.payload.clone(),
        )?)
    }
}

/// Result of an accepted edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResponse {
    /// Assigned sequence number
    pub seq: u64,
    /// Fingerprint of the tree after the edit
    pub fingerprint: GenomeHash,
}

/// Navigation verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAction {
    /// Push a scope; needs `target_id`
    Enter,
    /// Pop a scope
    Exit,
    /// List pushed scopes
    Breadcrumb,
    /// Current view
    Current,
    /// Back to the root
    Reset,
}

/// One navigation step within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationRequest {
    /// What to do
    pub action: NavigationAction,
    /// Scope to enter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<NodeId>,
}

impl NavigationRequest {
    /// Enter `id`
    #[must_use]
    pub fn enter(id: impl Into<NodeId>) -> Self {
        Self {
            action: NavigationAction::Enter,
            target_id: Some(id.into()),
        }
    }

    /// Action without a target
    #[must_use]
    pub fn action(action: NavigationAction) -> Self {
        Self {
            action,
            target_id: None,
        }
    }
}

/// Navigation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationResponse {
    /// Subtree entered, or view after exit/current
    Scope(ScopeView),
    /// Pushed scopes, outermost first
    Breadcrumb(Vec<Crumb>),
}

/// Scope for component resolution
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentScope {
    /// Whole tree
    #[default]
    Root,
    /// Subtree rooted at this id
    Node(NodeId),
}

/// Resolve fragments for a scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentRequest {
    /// Scope to resolve
    pub scope: ComponentScope,
}

/// Snapshot actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SnapshotRequest {
    /// Capture the current head
    Create {
        /// Unique snapshot name
        name: String,
    },
    /// List retained snapshots
    List,
}

/// Snapshot result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotResponse {
    /// Newly created snapshot
    Created(SnapshotDescriptor),
    /// Retained snapshots, oldest first
    Listed(Vec<SnapshotDescriptor>),
}

/// Log history query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryRequest {
    /// Only records targeting this node
    pub target_id: Option<NodeId>,
}

/// One log record, summarized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sequence number
    pub seq: u64,
    /// Edit target
    pub target: NodeId,
    /// Operation kind
    pub kind: OperationKind,
    /// The edit itself
    pub operation: Operation,
    /// Append time
    pub recorded_at: DateTime<Utc>,
    /// Chain digest
    pub digest: GenomeHash,
}

impl From<&ModificationRecord> for HistoryEntry {
    fn from(record: &ModificationRecord) -> Self {
        Self {
            seq: record.seq(),
            target: record.target().clone(),
            kind: record.kind(),
            operation: record.operation().clone(),
            recorded_at: record.recorded_at(),
            digest: *record.digest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn edit_request_decodes_payload() {
        let req: EditRequest = serde_json::from_value(json!({
            "target_id": "n2_test",
            "operation_kind": "set_attribute",
            "payload": {"key": "label", "value": "Updated"}
        }))
        .unwrap();
        assert_eq!(
            req.operation().unwrap(),
            Operation::set_attribute("label", "Updated")
        );
    }

    #[test]
    fn mismatched_payload_is_invalid_operation() {
        let req = EditRequest {
            target_id: NodeId::new("n1"),
            operation_kind: OperationKind::RemoveChild,
            payload: json!({"key": "label", "value": 1}),
        };
        assert_eq!(req.operation().unwrap_err().kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn edit_request_from_operation() {
        let op = Operation::remove_child("c1");
        let req = EditRequest::new("p", &op).unwrap();
        assert_eq!(req.operation_kind, OperationKind::RemoveChild);
        assert_eq!(req.payload, json!({"child_id": "c1"}));
        assert_eq!(req.operation().unwrap(), op);
    }

    #[test]
    fn wire_shapes() {
        let nav: NavigationRequest =
            serde_json::from_value(json!({"action": "enter", "target_id": "n0"})).unwrap();
        assert_eq!(nav, NavigationRequest::enter("n0"));

        let root: ComponentRequest = serde_json::from_value(json!({"scope": "root"})).unwrap();
        assert_eq!(root.scope, ComponentScope::Root);
        let node: ComponentRequest =
            serde_json::from_value(json!({"scope": {"node": "n1"}})).unwrap();
        assert_eq!(node.scope, ComponentScope::Node(NodeId::new("n1")));

        let snap: SnapshotRequest =
            serde_json::from_value(json!({"action": "create", "name": "v1"})).unwrap();
        assert_eq!(snap, SnapshotRequest::Create { name: "v1".into() });
        let list: SnapshotRequest = serde_json::from_value(json!({"action": "list"})).unwrap();
        assert_eq!(list, SnapshotRequest::List);
    }
}
