//! Genome UI Fragment Resolution
//!
//! Given a scope, picks which pre-rendered UI fragments apply:
//!
//! - **elite**: a small curated list, the same for every scope
//! - **contextual**: one key per distinct `ui_hint` found in the scope,
//!   depth-first, first-seen order, never repeating an elite key
//!
//! Every key is checked against a [`FragmentCatalog`]; a missing key is an
//! error carrying the nearest keys the catalog does have.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod error;
mod resolver;
mod suggest;

pub use catalog::{Fragment, FragmentCatalog, InMemoryCatalog};
pub use error::FragmentError;
pub use resolver::{ComponentResolver, ResolvedFragments, ResolverConfig, HINT_PLACEHOLDER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
