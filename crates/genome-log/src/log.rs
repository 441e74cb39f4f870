//! Append-only record store
//!
//! Records are shared as `Arc`s and never change after being pushed, so a
//! reader holding a prefix never races later appends.

use crate::error::LogError;
use crate::record::ModificationRecord;
use genome_model::{GenomeHash, NodeId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Ordered, append-only list of modification records
#[derive(Debug, Default)]
pub struct ModificationLog {
    records: RwLock<Vec<Arc<ModificationRecord>>>,
}

impl ModificationLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the next record
    ///
    /// # Errors
    /// Returns [`LogError::IntegrityViolation`] if the record's seq or
    /// previous digest does not continue the chain
    pub fn push(&self, record: ModificationRecord) -> Result<Arc<ModificationRecord>, LogError> {
        let mut records = self.records.write();
        let expected_seq = records.len() as u64 + 1;
        if record.seq() != expected_seq {
            return Err(LogError::IntegrityViolation {
                seq: record.seq(),
                reason: format!("expected seq {expected_seq}"),
            });
        }
        let last = records.last().map(|r| *r.digest()).unwrap_or_default();
        if *record.prev_digest() != last {
            return Err(LogError::IntegrityViolation {
                seq: record.seq(),
                reason: "previous digest does not match log tail".to_string(),
            });
        }
        let record = Arc::new(record);
        records.push(Arc::clone(&record));
        Ok(record)
    }

    /// Number of records (also the last seq)
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.read().len() as u64
    }

    /// Whether nothing has been appended
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Digest of the last record (zero when empty)
    #[must_use]
    pub fn tail_digest(&self) -> GenomeHash {
        self.records
            .read()
            .last()
            .map(|r| *r.digest())
            .unwrap_or_default()
    }

    /// Record by seq
    #[must_use]
    pub fn get(&self, seq: u64) -> Option<Arc<ModificationRecord>> {
        let index = usize::try_from(seq.checked_sub(1)?).ok()?;
        self.records.read().get(index).cloned()
    }

    /// Records with `from < seq <= to`, oldest first
    #[must_use]
    pub fn range(&self, from: u64, to: u64) -> Vec<Arc<ModificationRecord>> {
        let records = self.records.read();
        let end = usize::try_from(to).unwrap_or(usize::MAX).min(records.len());
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(end);
        records[start..end].to_vec()
    }

    /// Records with `seq <= to`, optionally only those targeting `target`
    #[must_use]
    pub fn history(&self, target: Option<&NodeId>, to: u64) -> Vec<Arc<ModificationRecord>> {
        self.range(0, to)
            .into_iter()
            .filter(|r| target.map_or(true, |t| r.target() == t))
            .collect()
    }

    /// Walk the chain and recompute every digest
    ///
    /// # Errors
    /// Returns [`LogError::IntegrityViolation`] at the first broken link
    pub fn verify_integrity(&self) -> Result<(), LogError> {
        let records = self.records.read();
        let mut prev = GenomeHash::default();
        for (index, record) in records.iter().enumerate() {
            let expected_seq = index as u64 + 1;
            if record.seq() != expected_seq {
                return Err(LogError::IntegrityViolation {
                    seq: record.seq(),
                    reason: format!("expected seq {expected_seq}"),
                });
            }
            if *record.prev_digest() != prev {
                return Err(LogError::IntegrityViolation {
                    seq: record.seq(),
                    reason: "chain link broken".to_string(),
                });
            }
            if !record.verify()? {
                return Err(LogError::IntegrityViolation {
                    seq: record.seq(),
                    reason: "digest mismatch".to_string(),
                });
            }
            prev = *record.digest();
        }
        Ok(())
    }
}
