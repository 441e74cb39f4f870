//! Genome Drill-Down Navigation
//!
//! A stack of scope ids over the latest effective tree of a
//! [`StateManager`](genome_log::StateManager). Entering narrows the view to
//! a pruned subtree; exiting widens it again.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut nav = DrillDown::new(state);
//! let phase = nav.enter(&"n0".into())?;
//! let section = nav.enter(&"n1".into())?;
//! assert_eq!(nav.breadcrumb()?.len(), 2);
//! nav.exit()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod navigator;
mod state_machine;

pub use error::NavError;
pub use genome_model::ScopeView;
pub use navigator::{Crumb, DrillDown};
pub use state_machine::{allowed_transitions, validate_transition, NavState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
