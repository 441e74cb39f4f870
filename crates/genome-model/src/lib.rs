//! Genome Tree Model
//!
//! In-memory representation of a genome: phases → sections → features →
//! components, four nesting levels, every node globally unique by id.
//!
//! # Core Concepts
//!
//! - [`Genome`]: Validated, immutable root document
//! - [`Node`]: One entry in the tree, with ordered children and attributes
//! - [`Level`]: The four ordered tiers, [`LevelSchema`] their required keys
//! - [`prune`]: Extract one node and its descendants as an isolated subtree
//! - [`GenomeHash`]: Structural fingerprint for equality checks
//!
//! # Example
//!
//! ```rust
//! use genome_model::{Genome, GenomeMeta, Level, LevelSchema, Node, prune};
//!
//! let section = Node::new("n1", Level::Section, "Section");
//! let phase = Node::new("n0", Level::Phase, "Phase").with_child(section);
//! let genome = Genome::from_phases(GenomeMeta::default(), vec![phase], &LevelSchema::default())?;
//!
//! let slice = prune(&genome, "n1").expect("present");
//! assert_eq!(slice.label, "Section");
//! assert!(prune(&genome, "missing").is_none());
//! # Ok::<(), genome_model::ModelError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod edit;
mod error;
mod genome;
mod hash;
mod id;
mod level;
mod node;
pub mod prune;
mod scope;

pub use error::ModelError;
pub use genome::{Genome, GenomeDocument, GenomeMeta, NodeLocation};
pub use hash::{GenomeHash, HashError};
pub use id::NodeId;
pub use level::{Level, LevelSchema, RESERVED_KEYS};
pub use node::{Descendants, Node};
pub use prune::{contains, is_strict_descendant, prune, prune_node};
pub use scope::ScopeView;

/// Attribute key whose string value selects a UI fragment
pub const UI_HINT_KEY: &str = "ui_hint";

/// Attribute key that set-attribute maps onto [`Node::label`]
pub const LABEL_KEY: &str = "label";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario() -> Genome {
        let feature = Node::new("n2_test", Level::Feature, "Feature")
            .with_attribute("endpoint", "/api/test")
            .with_attribute("method", "GET");
        let section = Node::new("n1_test", Level::Section, "Section").with_child(feature);
        let phase = Node::new("n0_test", Level::Phase, "Phase").with_child(section);
        let other = Node::new("n0_other", Level::Phase, "Other");
        Genome::from_phases(GenomeMeta::default(), vec![phase, other], &LevelSchema::default())
            .unwrap()
    }

    #[test]
    fn prune_section_keeps_children_and_drops_siblings() {
        let genome = scenario();
        let slice = prune(&genome, "n1_test").unwrap();

        assert_eq!(slice.id.as_str(), "n1_test");
        assert_eq!(slice.children.len(), 1);
        assert_eq!(slice.children[0].id.as_str(), "n2_test");
        assert!(!contains(&slice, "n0_other"));
    }

    #[test]
    fn prune_leaf_returns_only_leaf() {
        let genome = scenario();
        let slice = prune(&genome, "n2_test").unwrap();
        assert_eq!(slice.level, Level::Feature);
        assert!(slice.children.is_empty());
    }

    #[test]
    fn prune_missing_is_none() {
        assert!(prune(&scenario(), "missing_id").is_none());
    }

    #[test]
    fn fingerprint_tracks_structure() {
        let a = scenario();
        let b = scenario();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = scenario();
        c.set_attribute(&NodeId::from("n2_test"), LABEL_KEY, "Updated".into(), &LevelSchema::default())
            .unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
