//! Named snapshots
//!
//! A snapshot pins a log position together with the materialized tree at
//! that position, so rewinding does not replay from the base every time.
//! A name is bound to one log position for the life of the store, even
//! after its snapshot has been retired.

use crate::error::LogError;
use chrono::{DateTime, Utc};
use genome_model::{Genome, GenomeHash};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Snapshot retention and automatic capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotPolicy {
    /// Keep at most this many snapshots, dropping the oldest automatic
    /// one first, then the oldest named one
    pub max_retained: Option<usize>,

    /// Take `auto-<seq>` every N appends
    pub auto_every: Option<u64>,
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self {
            max_retained: Some(32),
            auto_every: None,
        }
    }
}

/// Immutable point-in-time capture of the effective tree
#[derive(Debug, Clone)]
pub struct Snapshot {
    name: String,
    seq: u64,
    created_at: DateTime<Utc>,
    fingerprint: GenomeHash,
    automatic: bool,
    tree: Arc<Genome>,
}

impl Snapshot {
    /// Capture `tree` as the state after record `seq`
    #[must_use]
    pub fn new(name: impl Into<String>, seq: u64, tree: Arc<Genome>) -> Self {
        Self {
            name: name.into(),
            seq,
            created_at: Utc::now(),
            fingerprint: tree.fingerprint(),
            automatic: false,
            tree,
        }
    }

    /// Policy-driven capture named `auto-<seq>`
    #[must_use]
    pub fn automatic(seq: u64, tree: Arc<Genome>) -> Self {
        Self {
            automatic: true,
            ..Self::new(format!("auto-{seq}"), seq, tree)
        }
    }

    /// Snapshot name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log position captured
    #[inline]
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Creation time
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Fingerprint of the captured tree
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> GenomeHash {
        self.fingerprint
    }

    /// Taken by the snapshot policy rather than by name
    #[inline]
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Captured tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &Arc<Genome> {
        &self.tree
    }

    /// Serializable summary
    #[must_use]
    pub fn descriptor(&self) -> SnapshotDescriptor {
        SnapshotDescriptor {
            name: self.name.clone(),
            seq: self.seq,
            created_at: self.created_at,
            fingerprint: self.fingerprint,
            automatic: self.automatic,
            node_count: self.tree.len(),
        }
    }
}

/// Snapshot summary without the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    /// Snapshot name
    pub name: String,
    /// Log position captured
    pub seq: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Fingerprint of the captured tree
    pub fingerprint: GenomeHash,
    /// Taken by the snapshot policy
    #[serde(default)]
    pub automatic: bool,
    /// Nodes in the captured tree
    pub node_count: usize,
}

#[derive(Debug, Default)]
struct Entries {
    retained: Vec<Arc<Snapshot>>,
    used: HashSet<String>,
}

impl Entries {
    fn retire_one(&mut self) {
        let index = self
            .retained
            .iter()
            .position(|s| s.automatic)
            .unwrap_or(0);
        let dropped = self.retained.remove(index);
        tracing::debug!(name = %dropped.name, seq = dropped.seq, "snapshot retired");
    }
}

/// Retained snapshots in creation order
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: RwLock<Entries>,
    max_retained: Option<usize>,
}

impl SnapshotStore {
    /// Create store with an optional retention cap
    #[must_use]
    pub fn new(max_retained: Option<usize>) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_retained,
        }
    }

    /// Add a snapshot, then retire snapshots beyond the cap
    ///
    /// # Errors
    /// Returns [`LogError::DuplicateSnapshotName`] if any snapshot, retained
    /// or retired, already used this name
    pub fn insert(&self, snapshot: Snapshot) -> Result<Arc<Snapshot>, LogError> {
        let mut entries = self.entries.write();
        if entries.used.contains(&snapshot.name) {
            return Err(LogError::DuplicateSnapshotName {
                name: snapshot.name,
            });
        }

        let snapshot = Arc::new(snapshot);
        entries.used.insert(snapshot.name.clone());
        entries.retained.push(Arc::clone(&snapshot));

        if let Some(max) = self.max_retained {
            while entries.retained.len() > max {
                entries.retire_one();
            }
        }
        Ok(snapshot)
    }

    /// Whether `name` was ever taken
    #[must_use]
    pub fn is_used(&self, name: &str) -> bool {
        self.entries.read().used.contains(name)
    }

    /// Snapshot by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Snapshot>> {
        self.entries
            .read()
            .retained
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    /// Latest snapshot taken at or before `seq`
    #[must_use]
    pub fn nearest(&self, seq: u64) -> Option<Arc<Snapshot>> {
        self.entries
            .read()
            .retained
            .iter()
            .filter(|s| s.seq <= seq)
            .max_by_key(|s| s.seq)
            .cloned()
    }

    /// All retained snapshots, oldest first
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Snapshot>> {
        self.entries.read().retained.clone()
    }

    /// Number retained
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().retained.len()
    }

    /// Whether none are retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().retained.is_empty()
    }
}
