//! Structural fingerprints
//!
//! Provides [`GenomeHash`], a 32-byte Blake3 hash over the canonical
//! structure of a genome. Nodes are fed in pre-order; every string is
//! length-prefixed and every collection count-prefixed, so distinct trees
//! cannot produce the same byte stream. Attribute values are fed as their
//! compact JSON text.

use crate::genome::Genome;
use crate::node::Node;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte structural hash (Blake3)
///
/// Cheap to copy. Two trees with equal structure, labels and attributes
/// hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GenomeHash([u8; 32]);

impl GenomeHash {
    /// Create from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Fingerprint of a whole genome, metadata included
    #[must_use]
    pub fn of_genome(genome: &Genome) -> Self {
        let mut hasher = blake3::Hasher::new();
        let meta = genome.meta();
        hasher.update(&meta.confidence.to_le_bytes());
        write_str(&mut hasher, meta.title.as_deref().unwrap_or(""));
        for (key, value) in &meta.extra {
            write_str(&mut hasher, key);
            write_str(&mut hasher, &value.to_string());
        }
        hasher.update(&(genome.phases().len() as u64).to_le_bytes());
        for phase in genome.phases() {
            feed_subtree(&mut hasher, phase);
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

fn write_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn feed_subtree(hasher: &mut blake3::Hasher, root: &Node) {
    for node in root.descendants() {
        write_str(hasher, node.id.as_str());
        hasher.update(&[node.level.depth()]);
        write_str(hasher, &node.label);
        hasher.update(&(node.attributes.len() as u64).to_le_bytes());
        for (key, value) in &node.attributes {
            write_str(hasher, key);
            write_str(hasher, &value.to_string());
        }
        hasher.update(&(node.children.len() as u64).to_le_bytes());
    }
}

impl Display for GenomeHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for GenomeHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for GenomeHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for GenomeHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to hash parsing
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Invalid hex encoding
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenomeMeta, Level, LevelSchema};

    #[test]
    fn compute_is_deterministic() {
        assert_eq!(GenomeHash::compute(b"x"), GenomeHash::compute(b"x"));
        assert_ne!(GenomeHash::compute(b"x"), GenomeHash::compute(b"y"));
    }

    #[test]
    fn display_parse_round_trip() {
        let hash = GenomeHash::compute(b"genome");
        let parsed: GenomeHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
        assert_eq!(hash.short().len(), 16);
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!(matches!(
            "abcd".parse::<GenomeHash>(),
            Err(HashError::InvalidLength { actual: 2, .. })
        ));
    }

    fn genome(phase: Node) -> Genome {
        Genome::from_phases(GenomeMeta::default(), vec![phase], &LevelSchema::permissive()).unwrap()
    }

    #[test]
    fn fingerprint_sees_attribute_changes() {
        let a = Node::new("p", Level::Phase, "P").with_attribute("owner", "table");
        let b = Node::new("p", Level::Phase, "P").with_attribute("owner", "form");
        assert_ne!(genome(a.clone()).fingerprint(), genome(b).fingerprint());
        assert_eq!(genome(a.clone()).fingerprint(), genome(a).fingerprint());
    }

    #[test]
    fn adjacent_fields_cannot_run_together() {
        let a = Node::new("p", Level::Phase, "ab").with_attribute("c", 1);
        let b = Node::new("p", Level::Phase, "a").with_attribute("bc", 1);
        assert_ne!(genome(a).fingerprint(), genome(b).fingerprint());

        let nested = Node::new("p", Level::Phase, "P")
            .with_child(Node::new("s", Level::Section, "S").with_child(Node::new("f", Level::Feature, "F")));
        let flat = Node::new("p", Level::Phase, "P")
            .with_child(Node::new("s", Level::Section, "S"))
            .with_child(Node::new("f", Level::Section, "F"));
        assert_ne!(genome(nested).fingerprint(), genome(flat).fingerprint());
    }
}
