//! The genome root document
//!
//! A [`Genome`] can only be built through validation, so every instance
//! upholds the tree invariants: unique ids, correct level nesting, no
//! children under components, and schema-complete attribute maps.

use crate::error::ModelError;
use crate::hash::GenomeHash;
use crate::id::NodeId;
use crate::level::{Level, LevelSchema};
use crate::node::{Descendants, Node};
use crate::prune;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeMeta {
    /// Confidence score in `[0, 1]`
    pub confidence: f64,

    /// Optional document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Anything else carried by the source document
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for GenomeMeta {
    fn default() -> Self {
        Self {
            confidence: 1.0,
            title: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Serialized form of a genome, before validation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenomeDocument {
    /// Document metadata
    #[serde(default)]
    pub meta: GenomeMeta,

    /// Top-level phases
    #[serde(default)]
    pub phases: Vec<Node>,
}

/// Position of a node as child indices from the root
///
/// The first index selects the phase. Only meaningful for the tree it was
/// computed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeLocation(Vec<usize>);

impl NodeLocation {
    /// Child indices, phase first
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Validated genome tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genome {
    meta: GenomeMeta,
    phases: Vec<Node>,
}

impl Genome {
    /// Validate phases and metadata into a genome
    ///
    /// # Errors
    /// Returns the first violation found in depth-first order
    pub fn from_phases(
        meta: GenomeMeta,
        phases: Vec<Node>,
        schema: &LevelSchema,
    ) -> Result<Self, ModelError> {
        let genome = Self { meta, phases };
        genome.validate(schema)?;
        tracing::debug!(nodes = genome.len(), "genome validated");
        Ok(genome)
    }

    /// Validate a deserialized document
    ///
    /// # Errors
    /// Same as [`Genome::from_phases`]
    pub fn from_document(doc: GenomeDocument, schema: &LevelSchema) -> Result<Self, ModelError> {
        Self::from_phases(doc.meta, doc.phases, schema)
    }

    /// Convert back into the serialized form
    #[must_use]
    pub fn into_document(self) -> GenomeDocument {
        GenomeDocument {
            meta: self.meta,
            phases: self.phases,
        }
    }

    /// Genome with no phases
    #[must_use]
    pub fn empty(meta: GenomeMeta) -> Self {
        Self {
            meta,
            phases: Vec::new(),
        }
    }

    /// Re-check every invariant
    ///
    /// # Errors
    /// Returns the first violation found in depth-first order
    pub fn validate(&self, schema: &LevelSchema) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.meta.confidence) {
            return Err(ModelError::InvalidMetadata(format!(
                "confidence {} outside [0, 1]",
                self.meta.confidence
            )));
        }

        let mut seen = HashSet::new();
        for phase in &self.phases {
            check_subtree(phase, Level::Phase, schema, &mut seen)?;
        }
        Ok(())
    }

    /// Metadata
    #[inline]
    #[must_use]
    pub fn meta(&self) -> &GenomeMeta {
        &self.meta
    }

    /// Top-level phases in stored order
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[Node] {
        &self.phases
    }

    /// Pre-order walk over every node
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> Descendants<'_> {
        Descendants::new(&self.phases)
    }

    /// Every id in pre-order
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes().map(|n| &n.id)
    }

    /// Total node count
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    /// Whether the genome has no phases
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Find node by id anywhere in the tree
    #[inline]
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Node> {
        prune::search(&self.phases, id)
    }

    /// Whether the id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Index path of a node
    #[must_use]
    pub fn locate(&self, id: &str) -> Option<NodeLocation> {
        let mut stack: Vec<(&Node, Vec<usize>)> = self
            .phases
            .iter()
            .enumerate()
            .rev()
            .map(|(i, n)| (n, vec![i]))
            .collect();

        while let Some((node, path)) = stack.pop() {
            if node.id == id {
                return Some(NodeLocation(path));
            }
            for (i, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
        }
        None
    }

    /// Node at a location
    #[must_use]
    pub fn node_at(&self, location: &NodeLocation) -> Option<&Node> {
        let (first, rest) = location.0.split_first()?;
        let mut node = self.phases.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    pub(crate) fn node_at_mut(&mut self, location: &NodeLocation) -> Option<&mut Node> {
        let (first, rest) = location.0.split_first()?;
        let mut node = self.phases.get_mut(*first)?;
        for i in rest {
            node = node.children.get_mut(*i)?;
        }
        Some(node)
    }

    /// Structural fingerprint
    ///
    /// Equal genomes always yield equal fingerprints.
    #[must_use]
    pub fn fingerprint(&self) -> GenomeHash {
        GenomeHash::of_genome(self)
    }
}

/// Validate one subtree rooted at `root`, which must sit at `expected`
///
/// Ids are recorded in `seen` so callers can check several subtrees
/// against each other.
pub(crate) fn check_subtree<'a>(
    root: &'a Node,
    expected: Level,
    schema: &LevelSchema,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ModelError> {
    let mut stack = vec![(root, expected)];

    while let Some((node, expected)) = stack.pop() {
        node.id.check()?;

        if node.level != expected {
            return Err(ModelError::LevelMismatch {
                id: node.id.clone(),
                expected,
                actual: node.level,
            });
        }

        if !seen.insert(node.id.as_str()) {
            return Err(ModelError::DuplicateId {
                id: node.id.clone(),
            });
        }

        schema.check_node(node)?;

        match node.level.child() {
            None if !node.children.is_empty() => {
                return Err(ModelError::LeafHasChildren {
                    id: node.id.clone(),
                })
            }
            None => {}
            Some(child_level) => {
                stack.extend(node.children.iter().rev().map(|c| (c, child_level)));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feature(id: &str) -> Node {
        Node::new(id, Level::Feature, id)
            .with_attribute("endpoint", format!("/{id}"))
            .with_attribute("method", "GET")
    }

    fn component(id: &str, hint: &str) -> Node {
        Node::new(id, Level::Component, id).with_attribute("ui_hint", hint)
    }

    fn sample_phases() -> Vec<Node> {
        vec![
            Node::new("p1", Level::Phase, "P1").with_child(
                Node::new("s1", Level::Section, "S1")
                    .with_child(feature("f1").with_child(component("c1", "table")))
                    .with_child(feature("f2")),
            ),
            Node::new("p2", Level::Phase, "P2"),
        ]
    }

    fn sample() -> Genome {
        Genome::from_phases(GenomeMeta::default(), sample_phases(), &LevelSchema::default())
            .unwrap()
    }

    #[test]
    fn find_walks_every_level() {
        let genome = sample();
        for id in ["p1", "s1", "f1", "c1", "f2", "p2"] {
            assert_eq!(genome.find(id).map(|n| n.id.as_str()), Some(id));
        }
        assert!(genome.find("nope").is_none());
    }

    #[test]
    fn ids_are_pre_order() {
        let ids: Vec<_> = sample().ids().map(NodeId::to_string).collect();
        assert_eq!(ids, vec!["p1", "s1", "f1", "c1", "f2", "p2"]);
    }

    #[test]
    fn locate_and_node_at_agree() {
        let genome = sample();
        let loc = genome.locate("c1").unwrap();
        assert_eq!(loc.indices(), &[0, 0, 0, 0]);
        assert_eq!(genome.node_at(&loc).unwrap().id.as_str(), "c1");
        assert!(genome.locate("nope").is_none());
    }

    #[test]
    fn duplicate_id_rejected_across_levels() {
        let mut phases = sample_phases();
        phases[1] = Node::new("p2", Level::Phase, "P2")
            .with_child(Node::new("s1", Level::Section, "dup"));
        let err = Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::default())
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateId { id: "s1".into() });
    }

    #[test]
    fn level_mismatch_rejected() {
        let phases = vec![Node::new("p", Level::Phase, "P").with_child(feature("f"))];
        let err = Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::LevelMismatch { expected: Level::Section, actual: Level::Feature, .. }
        ));
    }

    #[test]
    fn root_must_be_phase() {
        let phases = vec![Node::new("s", Level::Section, "S")];
        assert!(matches!(
            Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::default()),
            Err(ModelError::LevelMismatch { .. })
        ));
    }

    #[test]
    fn missing_attribute_names_node() {
        let phases = vec![Node::new("p", Level::Phase, "P").with_child(
            Node::new("s", Level::Section, "S")
                .with_child(Node::new("f", Level::Feature, "F").with_attribute("method", "GET")),
        )];
        let err = Genome::from_phases(GenomeMeta::default(), phases, &LevelSchema::default())
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingAttribute {
                id: "f".into(),
                level: Level::Feature,
                key: "endpoint".to_string(),
            }
        );
    }

    #[test]
    fn confidence_out_of_range_rejected() {
        let meta = GenomeMeta {
            confidence: 1.5,
            ..GenomeMeta::default()
        };
        assert!(matches!(
            Genome::from_phases(meta, Vec::new(), &LevelSchema::default()),
            Err(ModelError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn document_round_trips_through_json() {
        let genome = sample();
        let json = serde_json::to_string(&genome).unwrap();
        let doc: GenomeDocument = serde_json::from_str(&json).unwrap();
        let back = Genome::from_document(doc, &LevelSchema::default()).unwrap();
        assert_eq!(back, genome);
    }

    #[test]
    fn meta_keeps_extra_fields() {
        let doc: GenomeDocument = serde_json::from_str(
            r#"{"meta":{"confidence":0.8,"author":"ops"},"phases":[]}"#,
        )
        .unwrap();
        assert_eq!(doc.meta.confidence, 0.8);
        assert_eq!(doc.meta.extra.get("author"), Some(&Value::from("ops")));
    }
}
