//! Modification records
//!
//! A record is immutable once built. Records chain through their digests:
//! each digest covers the previous record's digest plus this record's
//! content, so any rewrite of history is detectable.
//!
//! Digest input, in order: previous digest, `seq` (little-endian), target
//! id (length-prefixed), `recorded_at` as RFC 3339 with nanoseconds and a
//! NUL terminator, then the operation as compact JSON.

use crate::error::LogError;
use crate::operation::{Operation, OperationKind};
use chrono::{DateTime, SecondsFormat, Utc};
use genome_model::{GenomeHash, NodeId};
use serde::{Deserialize, Serialize};

/// One logged edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRecord {
    seq: u64,
    target: NodeId,
    operation: Operation,
    recorded_at: DateTime<Utc>,
    prev_digest: GenomeHash,
    digest: GenomeHash,
}

impl ModificationRecord {
    /// Build record `seq`, chained onto `prev_digest`
    ///
    /// # Errors
    /// Returns [`LogError::Serialization`] if the operation cannot be encoded
    pub fn new(
        seq: u64,
        target: NodeId,
        operation: Operation,
        recorded_at: DateTime<Utc>,
        prev_digest: GenomeHash,
    ) -> Result<Self, LogError> {
        let digest = compute_digest(seq, &target, &operation, &recorded_at, &prev_digest)?;
        Ok(Self {
            seq,
            target,
            operation,
            recorded_at,
            prev_digest,
            digest,
        })
    }

    /// Sequence number (first record is 1)
    #[inline]
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Target node id
    #[inline]
    #[must_use]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// The edit
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Operation kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Append time
    #[inline]
    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Digest of the previous record (zero for the first)
    #[inline]
    #[must_use]
    pub fn prev_digest(&self) -> &GenomeHash {
        &self.prev_digest
    }

    /// Chained digest of this record
    #[inline]
    #[must_use]
    pub fn digest(&self) -> &GenomeHash {
        &self.digest
    }

    /// Recompute the digest and compare
    ///
    /// # Errors
    /// Returns [`LogError::Serialization`] if the operation cannot be encoded
    pub fn verify(&self) -> Result<bool, LogError> {
        let expected = compute_digest(
            self.seq,
            &self.target,
            &self.operation,
            &self.recorded_at,
            &self.prev_digest,
        )?;
        Ok(expected == self.digest)
    }
}

fn compute_digest(
    seq: u64,
    target: &NodeId,
    operation: &Operation,
    recorded_at: &DateTime<Utc>,
    prev_digest: &GenomeHash,
) -> Result<GenomeHash, LogError> {
    let op = serde_json::to_vec(operation).map_err(|e| LogError::Serialization(e.to_string()))?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(prev_digest.as_bytes());
    hasher.update(&seq.to_le_bytes());
    hasher.update(&(target.as_str().len() as u64).to_le_bytes());
    hasher.update(target.as_str().as_bytes());
    hasher.update(
        recorded_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    hasher.update(&[0]);
    hasher.update(&op);
    Ok(GenomeHash::new(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seq: u64, prev: GenomeHash) -> ModificationRecord {
        ModificationRecord::new(
            seq,
            NodeId::new("n1"),
            Operation::set_attribute("label", "x"),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            prev,
        )
        .unwrap()
    }

    #[test]
    fn digest_is_deterministic() {
        let a = record(1, GenomeHash::default());
        let b = record(1, GenomeHash::default());
        assert_eq!(a.digest(), b.digest());
        assert!(a.verify().unwrap());
    }

    #[test]
    fn digest_depends_on_chain() {
        let first = record(1, GenomeHash::default());
        let second = record(2, *first.digest());
        let forked = record(2, GenomeHash::compute(b"other"));
        assert_ne!(second.digest(), forked.digest());
    }

    #[test]
    fn digest_covers_time_and_operation() {
        let base = record(1, GenomeHash::default());
        let later = ModificationRecord::new(
            1,
            NodeId::new("n1"),
            Operation::set_attribute("label", "x"),
            DateTime::from_timestamp(1_700_000_000, 1).unwrap(),
            GenomeHash::default(),
        )
        .unwrap();
        let other_op = ModificationRecord::new(
            1,
            NodeId::new("n1"),
            Operation::set_attribute("label", "y"),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            GenomeHash::default(),
        )
        .unwrap();
        assert_ne!(base.digest(), later.digest());
        assert_ne!(base.digest(), other_op.digest());
    }

    #[test]
    fn tampered_record_fails_verify() {
        let rec = record(1, GenomeHash::default());
        let mut json = serde_json::to_value(&rec).unwrap();
        json["target"] = serde_json::Value::from("n2");
        let tampered: ModificationRecord = serde_json::from_value(json).unwrap();
        assert!(!tampered.verify().unwrap());
    }
}
