//! Genome Modification Log
//!
//! Ordered, append-only edits against an immutable base genome, with
//! deterministic replay and named snapshots.
//!
//! # Core Concepts
//!
//! - [`Operation`]: set-attribute, add-child, remove-child, replace-subtree
//! - [`ModificationRecord`]: One immutable, digest-chained log entry
//! - [`StateManager`]: Base + log → effective tree, as of any seq
//! - [`Snapshot`]: Named log position with its materialized tree
//!
//! # Example
//!
//! ```rust,ignore
//! use genome_log::{AsOf, Operation, StateManager};
//!
//! let state = StateManager::new(base, LevelSchema::default());
//! let seq = state.append(&"n2".into(), Operation::set_attribute("label", "Updated"))?;
//!
//! let now = state.effective_tree(AsOf::Latest)?;
//! let before = state.effective_tree(AsOf::Seq(seq - 1))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod log;
mod operation;
mod record;
mod snapshot;
mod state;

pub use error::LogError;
pub use log::ModificationLog;
pub use operation::{Operation, OperationKind};
pub use record::ModificationRecord;
pub use snapshot::{Snapshot, SnapshotDescriptor, SnapshotPolicy, SnapshotStore};
pub use state::{AsOf, StateManager};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
