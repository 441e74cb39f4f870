//! Genome Core - service facade
//!
//! Ties the layers together:
//! - Loads and validates genome documents (JSON/YAML)
//! - Reads configuration (TOML/YAML)
//! - Applies edits through the modification log
//! - Runs drill-down navigation sessions
//! - Resolves UI fragments for a scope
//!
//! # Example
//!
//! ```rust,ignore
//! use genome_core::prelude::*;
//!
//! let config = GenomeConfig::from_path(Path::new("genome.toml"))?;
//! let genome = load_genome(Path::new("genome.json"), &config.schema)?;
//! let catalog = Arc::new(load_catalog(Path::new("fragments.yaml"))?);
//! let service = GenomeService::from_config(genome, catalog, &config)?;
//!
//! let session = service.open_session();
//! service.navigate(session, &NavigationRequest::enter("n0"))?;
//! let fragments = service.session_components(session)?;
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;
pub mod request;
pub mod service;

pub use config::{FragmentsConfig, GenomeConfig};
pub use error::{ErrorKind, GenomeError, Result};
pub use loader::{load_catalog, load_edits, load_genome, parse_genome, DocumentFormat};
pub use request::{
    ComponentRequest, ComponentScope, EditRequest, EditResponse, HistoryEntry, HistoryRequest,
    NavigationAction, NavigationRequest, NavigationResponse, SnapshotRequest, SnapshotResponse,
};
pub use service::{GenomeService, SessionId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the genome service
    pub use crate::{
        load_catalog, load_genome, ComponentRequest, EditRequest, GenomeConfig, GenomeError,
        GenomeService, NavigationAction, NavigationRequest, SnapshotRequest,
    };
    pub use genome_log::{AsOf, Operation};
    pub use genome_model::{Genome, NodeId, ScopeView};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
