//! Genome service facade
//!
//! Owns the state manager, the component resolver and the open
//! navigation sessions. Every operation takes `&self`, so one service can
//! be shared behind an `Arc` by a transport layer.

use crate::config::GenomeConfig;
use crate::error::{GenomeError, Result};
use crate::request::{
    ComponentRequest, ComponentScope, EditRequest, EditResponse, HistoryEntry, HistoryRequest,
    NavigationAction, NavigationRequest, NavigationResponse, SnapshotRequest, SnapshotResponse,
};
use dashmap::DashMap;
use genome_fragments::{ComponentResolver, FragmentCatalog, ResolvedFragments};
use genome_log::{AsOf, StateManager};
use genome_model::{prune, Genome, ScopeView};
use genome_nav::DrillDown;
use std::sync::Arc;
use uuid::Uuid;

/// Navigation session handle
pub type SessionId = Uuid;

/// Edit, navigate and resolve fragments over one genome
#[derive(Debug)]
pub struct GenomeService {
    state: Arc<StateManager>,
    resolver: ComponentResolver,
    sessions: DashMap<SessionId, DrillDown>,
}

impl GenomeService {
    /// Create service from its parts
    #[must_use]
    pub fn new(state: Arc<StateManager>, resolver: ComponentResolver) -> Self {
        Self {
            state,
            resolver,
            sessions: DashMap::new(),
        }
    }

    /// Build state manager and resolver from configuration
    ///
    /// # Errors
    /// [`GenomeError::Config`] if the configuration is invalid
    pub fn from_config(
        base: Genome,
        catalog: Arc<dyn FragmentCatalog>,
        config: &GenomeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let state = Arc::new(StateManager::with_policy(
            base,
            config.schema.clone(),
            config.snapshots.clone(),
        ));
        let resolver = ComponentResolver::new(
            config.fragments.elite.clone(),
            catalog,
            config.fragments.resolver_config(),
        )?;
        Ok(Self::new(state, resolver))
    }

    /// Underlying state manager
    #[inline]
    #[must_use]
    pub fn state(&self) -> &Arc<StateManager> {
        &self.state
    }

    /// Component resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    /// Validate and append one edit
    ///
    /// # Errors
    /// `InvalidOperation` for a payload that does not fit its kind, or any
    /// append error
    pub fn edit(&self, request: &EditRequest) -> Result<EditResponse> {
        let operation = request.operation()?;
        let (seq, head) = self.state.append_with_head(&request.target_id, operation)?;
        Ok(EditResponse {
            seq,
            fingerprint: head.fingerprint(),
        })
    }

    /// Materialize the tree at a log position
    ///
    /// # Errors
    /// `SequenceOutOfRange` past the head
    pub fn effective_tree(&self, as_of: AsOf) -> Result<Arc<Genome>> {
        Ok(self.state.effective_tree(as_of)?)
    }

    /// Start a navigation session at root
    #[must_use]
    pub fn open_session(&self) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions
            .insert(id, DrillDown::new(Arc::clone(&self.state)));
        tracing::debug!(session = %id, "session opened");
        id
    }

    /// Discard a session
    ///
    /// # Errors
    /// `SessionNotFound` for an unknown id
    pub fn close_session(&self, id: SessionId) -> Result<()> {
        if self.sessions.remove(&id).is_none() {
            return Err(GenomeError::SessionNotFound { id });
        }
        tracing::debug!(session = %id, "session closed");
        Ok(())
    }

    /// Number of open sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Apply one navigation step to a session
    ///
    /// # Errors
    /// `SessionNotFound`, `InvalidOperation` for an enter without a target,
    /// or any navigation error
    pub fn navigate(&self, id: SessionId, request: &NavigationRequest) -> Result<NavigationResponse> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(GenomeError::SessionNotFound { id })?;

        let response = match request.action {
            NavigationAction::Enter => {
                let target = request.target_id.as_ref().ok_or_else(|| {
                    GenomeError::InvalidRequest("enter requires target_id".to_string())
                })?;
                NavigationResponse::Scope(ScopeView::Node(session.enter(target)?))
            }
            NavigationAction::Exit => NavigationResponse::Scope(session.exit()?),
            NavigationAction::Breadcrumb => NavigationResponse::Breadcrumb(session.breadcrumb()?),
            NavigationAction::Current => NavigationResponse::Scope(session.current_scope()?),
            NavigationAction::Reset => {
                session.reset();
                NavigationResponse::Scope(session.current_scope()?)
            }
        };
        Ok(response)
    }

    /// Resolve fragments for a scope of the latest tree
    ///
    /// # Errors
    /// `NotFound` for an unknown scope id, `FragmentNotFound` for a key
    /// missing from the catalog
    pub fn components(&self, request: &ComponentRequest) -> Result<ResolvedFragments> {
        let tree = self.state.effective_tree(AsOf::Latest)?;
        let scope = match &request.scope {
            ComponentScope::Root => ScopeView::Root(tree),
            ComponentScope::Node(id) => ScopeView::Node(
                prune(&tree, id.as_str()).ok_or_else(|| GenomeError::NotFound { id: id.clone() })?,
            ),
        };
        Ok(self.resolver.resolve(&scope)?)
    }

    /// Fragments for a session's current scope
    ///
    /// # Errors
    /// `SessionNotFound`, navigation errors, or `FragmentNotFound`
    pub fn session_components(&self, id: SessionId) -> Result<ResolvedFragments> {
        let scope = self
            .sessions
            .get(&id)
            .ok_or(GenomeError::SessionNotFound { id })?
            .current_scope()?;
        Ok(self.resolver.resolve(&scope)?)
    }

    /// Create or list snapshots
    ///
    /// # Errors
    /// `DuplicateSnapshotName` or `InvalidOperation` for a blank name
    pub fn snapshots(&self, request: &SnapshotRequest) -> Result<SnapshotResponse> {
        match request {
            SnapshotRequest::Create { name } => Ok(SnapshotResponse::Created(
                self.state.snapshot(name)?.descriptor(),
            )),
            SnapshotRequest::List => Ok(SnapshotResponse::Listed(
                self.state.snapshots().iter().map(|s| s.descriptor()).collect(),
            )),
        }
    }

    /// Published records, oldest first
    #[must_use]
    pub fn history(&self, request: &HistoryRequest) -> Vec<HistoryEntry> {
        self.state
            .history(request.target_id.as_ref())
            .iter()
            .map(|record| HistoryEntry::from(record.as_ref()))
            .collect()
    }

    /// Re-check the record chain
    ///
    /// # Errors
    /// `IntegrityViolation` at the first broken link
    pub fn verify_integrity(&self) -> Result<()> {
        Ok(self.state.verify_integrity()?)
    }
}
