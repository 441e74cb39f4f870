//! State manager: base genome + modification log = effective genome
//!
//! # Concurrency
//! - `append` and `snapshot` serialize on a single writer mutex
//! - A new record and the matching head tree are published together under
//!   the `published` write lock, so readers see both or neither
//! - Replays read an `Arc` prefix of the log and never block writers for
//!   longer than the prefix copy

use crate::error::LogError;
use crate::log::ModificationLog;
use crate::operation::Operation;
use crate::record::ModificationRecord;
use crate::snapshot::{Snapshot, SnapshotPolicy, SnapshotStore};
use chrono::Utc;
use genome_model::{Genome, LevelSchema, NodeId};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Log position to materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsOf {
    /// Every published record
    Latest,
    /// Records up to and including this seq; 0 is the base
    Seq(u64),
}

#[derive(Debug)]
struct Published {
    seq: u64,
    head: Arc<Genome>,
}

/// Owns the immutable base, the log and the snapshots
#[derive(Debug)]
pub struct StateManager {
    base: Arc<Genome>,
    schema: LevelSchema,
    policy: SnapshotPolicy,
    log: ModificationLog,
    snapshots: SnapshotStore,
    published: RwLock<Published>,
    writer: Mutex<()>,
}

impl StateManager {
    /// Create manager over a validated base genome
    #[must_use]
    pub fn new(base: Genome, schema: LevelSchema) -> Self {
        Self::with_policy(base, schema, SnapshotPolicy::default())
    }

    /// Create manager with an explicit snapshot policy
    #[must_use]
    pub fn with_policy(base: Genome, schema: LevelSchema, policy: SnapshotPolicy) -> Self {
        let base = Arc::new(base);
        Self {
            published: RwLock::new(Published {
                seq: 0,
                head: Arc::clone(&base),
            }),
            base,
            schema,
            snapshots: SnapshotStore::new(policy.max_retained),
            policy,
            log: ModificationLog::new(),
            writer: Mutex::new(()),
        }
    }

    /// The base genome, never modified
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Arc<Genome> {
        &self.base
    }

    /// Level schema edits are validated against
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &LevelSchema {
        &self.schema
    }

    /// Snapshot policy in force
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &SnapshotPolicy {
        &self.policy
    }

    /// Seq of the latest published record (0 if none)
    #[must_use]
    pub fn head_seq(&self) -> u64 {
        self.published.read().seq
    }

    /// Validate and append an edit
    ///
    /// The edit is trial-applied to a copy of the current head; nothing is
    /// recorded unless it applies cleanly.
    ///
    /// # Errors
    /// `TargetNotFound`, `ChildNotFound`, `DuplicateId` or
    /// `InvalidOperation` if the edit does not apply to the current tree
    pub fn append(&self, target: &NodeId, operation: Operation) -> Result<u64, LogError> {
        self.append_with_head(target, operation).map(|(seq, _)| seq)
    }

    /// [`append`](Self::append), also returning the head it published
    ///
    /// # Errors
    /// Same as [`append`](Self::append)
    pub fn append_with_head(
        &self,
        target: &NodeId,
        operation: Operation,
    ) -> Result<(u64, Arc<Genome>), LogError> {
        let _writer = self.writer.lock();

        let (seq, head) = {
            let published = self.published.read();
            (published.seq, Arc::clone(&published.head))
        };

        if !head.contains(target.as_str()) {
            tracing::warn!(node = %target, kind = %operation.kind(), "edit rejected: target not found");
            return Err(LogError::TargetNotFound { id: target.clone() });
        }

        let mut next = Genome::clone(&head);
        if let Err(err) = operation.apply(&mut next, target, &self.schema) {
            tracing::warn!(node = %target, kind = %operation.kind(), error = %err, "edit rejected");
            return Err(err);
        }

        let kind = operation.kind();
        let record = ModificationRecord::new(
            seq + 1,
            target.clone(),
            operation,
            Utc::now(),
            self.log.tail_digest(),
        )?;

        let next = Arc::new(next);
        {
            let mut published = self.published.write();
            self.log.push(record)?;
            published.seq = seq + 1;
            published.head = Arc::clone(&next);
        }
        tracing::info!(seq = seq + 1, node = %target, %kind, "modification appended");

        if let Some(every) = self.policy.auto_every {
            if every > 0 && (seq + 1) % every == 0 {
                let snapshot = Snapshot::automatic(seq + 1, Arc::clone(&next));
                if !self.snapshots.is_used(snapshot.name()) {
                    self.snapshots.insert(snapshot)?;
                }
            }
        }

        Ok((seq + 1, next))
    }

    /// Materialize the tree at a log position
    ///
    /// Starts from the nearest snapshot at or before the position (or the
    /// base) and replays the remaining records in order.
    ///
    /// # Errors
    /// `SequenceOutOfRange` past the head; `ReplayFailed` if a record no
    /// longer applies
    pub fn effective_tree(&self, as_of: AsOf) -> Result<Arc<Genome>, LogError> {
        let (head_seq, head) = {
            let published = self.published.read();
            (published.seq, Arc::clone(&published.head))
        };

        let target = match as_of {
            AsOf::Latest => return Ok(head),
            AsOf::Seq(seq) if seq > head_seq => {
                return Err(LogError::SequenceOutOfRange {
                    requested: seq,
                    head: head_seq,
                })
            }
            AsOf::Seq(seq) if seq == head_seq => return Ok(head),
            AsOf::Seq(seq) => seq,
        };

        let (start_seq, start) = match self.snapshots.nearest(target) {
            Some(snapshot) => (snapshot.seq(), Arc::clone(snapshot.tree())),
            None => (0, Arc::clone(&self.base)),
        };

        if start_seq == target {
            return Ok(start);
        }

        let tree = self.replay_onto(&start, start_seq, target)?;
        Ok(Arc::new(tree))
    }

    /// Replay from the base, ignoring snapshots and the cached head
    ///
    /// # Errors
    /// Same as [`StateManager::effective_tree`]
    pub fn replay_from_base(&self, as_of: AsOf) -> Result<Genome, LogError> {
        let head_seq = self.head_seq();
        let target = match as_of {
            AsOf::Latest => head_seq,
            AsOf::Seq(seq) if seq > head_seq => {
                return Err(LogError::SequenceOutOfRange {
                    requested: seq,
                    head: head_seq,
                })
            }
            AsOf::Seq(seq) => seq,
        };
        self.replay_onto(&self.base, 0, target)
    }

    fn replay_onto(&self, start: &Genome, from: u64, to: u64) -> Result<Genome, LogError> {
        let records = self.log.range(from, to);
        tracing::debug!(from, to, records = records.len(), "replaying log");

        let mut tree = start.clone();
        for record in records {
            record
                .operation()
                .apply(&mut tree, record.target(), &self.schema)
                .map_err(|source| LogError::ReplayFailed {
                    seq: record.seq(),
                    source: Box::new(source),
                })?;
        }
        Ok(tree)
    }

    /// Capture the current head under `name`
    ///
    /// # Errors
    /// `InvalidSnapshotName` for a blank name, `DuplicateSnapshotName` if
    /// the name was used before
    pub fn snapshot(&self, name: &str) -> Result<Arc<Snapshot>, LogError> {
        if name.trim().is_empty() {
            return Err(LogError::InvalidSnapshotName {
                name: name.to_string(),
                reason: "blank",
            });
        }

        let _writer = self.writer.lock();
        let (seq, head) = {
            let published = self.published.read();
            (published.seq, Arc::clone(&published.head))
        };
        let snapshot = self.snapshots.insert(Snapshot::new(name, seq, head))?;
        tracing::info!(name, seq, fingerprint = %snapshot.fingerprint().short(), "snapshot created");
        Ok(snapshot)
    }

    /// Retained snapshots, oldest first
    #[must_use]
    pub fn snapshots(&self) -> Vec<Arc<Snapshot>> {
        self.snapshots.list()
    }

    /// Snapshot by name
    ///
    /// # Errors
    /// `SnapshotNotFound` if no retained snapshot has this name
    pub fn snapshot_named(&self, name: &str) -> Result<Arc<Snapshot>, LogError> {
        self.snapshots
            .get(name)
            .ok_or_else(|| LogError::SnapshotNotFound {
                name: name.to_string(),
            })
    }

    /// Tree captured by a named snapshot
    ///
    /// # Errors
    /// `SnapshotNotFound` if no retained snapshot has this name
    pub fn effective_tree_at_snapshot(&self, name: &str) -> Result<Arc<Genome>, LogError> {
        Ok(Arc::clone(self.snapshot_named(name)?.tree()))
    }

    /// Published records, optionally only those targeting `target`
    #[must_use]
    pub fn history(&self, target: Option<&NodeId>) -> Vec<Arc<ModificationRecord>> {
        self.log.history(target, self.head_seq())
    }

    /// Record by seq
    #[must_use]
    pub fn record(&self, seq: u64) -> Option<Arc<ModificationRecord>> {
        if seq > self.head_seq() {
            return None;
        }
        self.log.get(seq)
    }

    /// Verify the record chain
    ///
    /// # Errors
    /// `IntegrityViolation` at the first broken link
    pub fn verify_integrity(&self) -> Result<(), LogError> {
        self.log.verify_integrity()
    }
}
