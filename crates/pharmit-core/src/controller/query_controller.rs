use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::state::{lock, ControllerPhase, PharmacophoreCandidate, PhaseGuard, PickMode};
use crate::catalog::QueryCatalog;
use crate::error::{QueryError, Result};
use crate::feature::{Feature, Position};
use crate::filter::{FilterField, FilterViolation};
use crate::search::{QuerySnapshot, SearchDispatcher, SearchResults};
use crate::session::{
    QueryEvent, SessionCodec, SessionDocument, SessionRepository, SessionState, ViewNotifier,
};
use crate::visualization::{Role, StyleId};

/// Result of a successful session load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadOutcome {
    /// Filter invariants the loaded session violates. Loading succeeds regardless.
    pub warnings: Vec<FilterViolation>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of a successful session save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveOutcome {
    /// Filter invariants the saved session violates. It was written regardless.
    pub warnings: Vec<FilterViolation>,
}

impl SaveOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Orchestrates query editing, search dispatch and session persistence.
///
/// `QueryController` is responsible for:
/// - Applying view commands to the live session, in the order they are issued
/// - Validating filters and handing an immutable snapshot to the dispatcher
/// - Saving and loading sessions through the codec and repository
/// - Publishing outcomes to the view
///
/// Only one of search, load, save or new-query may be active at a time.
/// Feature, filter, style and vendor edits stay available while a search
/// is dispatched; the in-flight search works on its own snapshot.
pub struct QueryController {
    catalog: QueryCatalog,
    /// Live editable session
    live: RwLock<SessionState>,
    phase: Mutex<ControllerPhase>,
    pick_mode: Mutex<PickMode>,
    dispatcher: Arc<dyn SearchDispatcher>,
    repository: Arc<dyn SessionRepository>,
    codec: Arc<dyn SessionCodec>,
    notifier: Arc<dyn ViewNotifier>,
}

impl QueryController {
    /// Creates a controller holding an empty query built from `catalog`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Read-only palette and vendor tables
    /// * `dispatcher` - Backend that runs searches
    /// * `repository` - Store for serialized sessions
    /// * `codec` - Wire format of serialized sessions
    /// * `notifier` - Receiver of view notifications
    pub fn new(
        catalog: QueryCatalog,
        dispatcher: Arc<dyn SearchDispatcher>,
        repository: Arc<dyn SessionRepository>,
        codec: Arc<dyn SessionCodec>,
        notifier: Arc<dyn ViewNotifier>,
    ) -> Self {
        let live = SessionState::new(&catalog);
        Self {
            catalog,
            live: RwLock::new(live),
            phase: Mutex::new(ControllerPhase::Idle),
            pick_mode: Mutex::new(PickMode::Add),
            dispatcher,
            repository,
            codec,
            notifier,
        }
    }

    pub fn catalog(&self) -> &QueryCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> ControllerPhase {
        *lock(&self.phase)
    }

    /// A copy of the live session.
    pub async fn session_state(&self) -> SessionState {
        self.live.read().await.clone()
    }

    pub async fn document(&self) -> SessionDocument {
        self.live.read().await.to_document()
    }

    /// The snapshot a search started now would receive.
    pub async fn snapshot(&self) -> QuerySnapshot {
        self.live.read().await.snapshot()
    }

    // ============================================================================
    // Feature commands
    // ============================================================================

    pub async fn add_feature(&self, feature: Feature) -> Result<usize> {
        self.live.write().await.features.add(feature)
    }

    pub async fn remove_feature(&self, index: usize) -> Result<Feature> {
        self.live.write().await.features.remove(index)
    }

    pub async fn set_feature_enabled(&self, index: usize, enabled: bool) -> Result<()> {
        self.live.write().await.features.set_enabled(index, enabled)
    }

    pub async fn update_feature(&self, index: usize, feature: Feature) -> Result<()> {
        self.live.write().await.features.update(index, feature)
    }

    /// Replaces the whole feature list, e.g. from a features file.
    ///
    /// All-or-nothing: an invalid feature leaves the current list untouched.
    pub async fn load_features(&self, features: Vec<Feature>) -> Result<()> {
        let document = {
            let mut live = self.live.write().await;
            live.features.replace_all(features)?;
            live.to_document()
        };
        info!(count = document.features.len(), "Features loaded");
        self.notifier.notify(QueryEvent::StateReplaced { document });
        Ok(())
    }

    // ============================================================================
    // Filter, style and vendor commands
    // ============================================================================

    pub async fn set_filter(&self, field: FilterField, value: f64) -> Result<()> {
        self.live.write().await.filters.set(field, value)
    }

    pub async fn clear_filter(&self, field: FilterField) {
        self.live.write().await.filters.clear(field)
    }

    /// Checks the filters without starting a search.
    pub async fn validate_filters(&self) -> Vec<FilterViolation> {
        self.live.read().await.filters.validate()
    }

    pub async fn set_style(&self, role: Role, style: StyleId) -> Result<()> {
        self.live.write().await.visualization.set_style(role, style)
    }

    /// Sets a style for a role given by name, as the view reports it.
    pub async fn set_style_by_name(&self, role: &str, style: usize) -> Result<()> {
        self.live
            .write()
            .await
            .visualization
            .set_style_by_name(role, style)
    }

    pub async fn select_vendor(&self, name: &str) -> Result<()> {
        self.live.write().await.vendor.select_vendor(name)
    }

    pub fn list_vendors(&self) -> Vec<String> {
        self.catalog.vendors().to_vec()
    }

    // ============================================================================
    // Picking
    // ============================================================================

    pub fn pick_mode(&self) -> PickMode {
        *lock(&self.pick_mode)
    }

    pub fn set_pick_mode(&self, mode: PickMode) {
        debug!(?mode, "Pick mode set");
        *lock(&self.pick_mode) = mode;
    }

    /// Applies a viewer pick according to the current pick mode.
    pub async fn pick_feature(&self, candidate: PharmacophoreCandidate) -> Result<usize> {
        let mode = self.pick_mode();
        self.pick_feature_with(candidate, mode).await
    }

    /// Applies a viewer pick with an explicit mode.
    ///
    /// `Add` creates a feature from the candidate and returns its index.
    /// `Edit` moves the feature at `index` to the candidate's position.
    pub async fn pick_feature_with(
        &self,
        candidate: PharmacophoreCandidate,
        mode: PickMode,
    ) -> Result<usize> {
        let mut live = self.live.write().await;
        match mode {
            PickMode::Add => {
                let radius = candidate
                    .radius
                    .unwrap_or_else(|| candidate.kind.default_radius());
                live.features
                    .add(Feature::new(candidate.kind, candidate.position, radius))
            }
            PickMode::Edit { index } => {
                live.features.set_position(index, candidate.position)?;
                Ok(index)
            }
        }
    }

    /// Moves a feature, as an edit-mode pick would.
    pub async fn move_feature(&self, index: usize, position: Position) -> Result<()> {
        self.live.write().await.features.set_position(index, position)
    }

    // ============================================================================
    // Search
    // ============================================================================

    /// Validates the filters and dispatches a snapshot of the live query.
    ///
    /// # Errors
    ///
    /// - `OperationInProgress` if another search, load or save is active
    /// - `ValidationFailed` if filters violate their invariants (nothing is dispatched)
    /// - `SearchFailed` if the dispatcher reports an error
    pub async fn start_search(&self) -> Result<SearchResults> {
        let guard = PhaseGuard::begin(&self.phase, ControllerPhase::Validating)?;

        let validated = {
            let live = self.live.read().await;
            let violations = live.filters.validate();
            if violations.is_empty() {
                Ok(live.snapshot())
            } else {
                Err(violations)
            }
        };

        let snapshot = match validated {
            Ok(snapshot) => snapshot,
            Err(violations) => {
                drop(guard);
                warn!(count = violations.len(), "Search refused: filters are invalid");
                self.notifier.notify(QueryEvent::ValidationFailed {
                    violations: violations.clone(),
                });
                return Err(QueryError::ValidationFailed { violations });
            }
        };

        guard.advance(ControllerPhase::Dispatching);
        let vendor = snapshot.vendor.clone();
        info!(
            vendor = %vendor,
            features = snapshot.features.len(),
            "Dispatching search"
        );

        let outcome = self.dispatcher.submit(&vendor, snapshot).await;
        drop(guard);

        match outcome {
            Ok(results) => {
                info!(vendor = %vendor, hits = ?results.hit_count, "Search completed");
                self.notifier.notify(QueryEvent::SearchCompleted {
                    results: results.clone(),
                });
                Ok(results)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(vendor = %vendor, error = %message, "Search failed");
                self.notifier.notify(QueryEvent::SearchFailed {
                    vendor: vendor.clone(),
                    message: message.clone(),
                });
                Err(QueryError::SearchFailed { vendor, message })
            }
        }
    }

    // ============================================================================
    // Sessions
    // ============================================================================

    /// Resets the live session to an empty query with catalog defaults.
    pub async fn new_query(&self) -> Result<()> {
        let guard = PhaseGuard::begin(&self.phase, ControllerPhase::Loading)?;
        let fresh = SessionState::new(&self.catalog);
        let document = fresh.to_document();
        *self.live.write().await = fresh;
        drop(guard);

        info!("New query started");
        self.notifier.notify(QueryEvent::StateReplaced { document });
        Ok(())
    }

    /// Saves the live session (not a search snapshot) under `handle`.
    ///
    /// A session whose filters violate their invariants is still written so
    /// that it can be repaired one field at a time; the violations are
    /// returned in [`SaveOutcome::warnings`] and published as
    /// `SessionSavedWithWarnings`. Searching stays refused until they are fixed.
    /// A failed save leaves the live session untouched.
    pub async fn save_session(&self, handle: &str) -> Result<SaveOutcome> {
        let guard = PhaseGuard::begin(&self.phase, ControllerPhase::Saving)?;

        let (document, warnings) = {
            let live = self.live.read().await;
            (live.to_document(), live.filters.validate())
        };

        let result = match self.codec.encode(&document) {
            Ok(serialized) => self.repository.save(handle, &serialized).await,
            Err(e) => Err(e),
        };
        drop(guard);

        match result {
            Ok(()) => {
                info!(
                    handle,
                    features = document.features.len(),
                    warnings = warnings.len(),
                    "Session saved"
                );
                self.notifier.notify(QueryEvent::SessionSaved {
                    handle: handle.to_string(),
                });
                if !warnings.is_empty() {
                    self.notifier.notify(QueryEvent::SessionSavedWithWarnings {
                        handle: handle.to_string(),
                        violations: warnings.clone(),
                    });
                }
                Ok(SaveOutcome { warnings })
            }
            Err(e) => {
                let message = e.to_string();
                warn!(handle, error = %message, "Session save failed");
                self.notifier.notify(QueryEvent::SessionSaveError {
                    handle: handle.to_string(),
                    message: message.clone(),
                });
                Err(QueryError::SessionSaveError { message })
            }
        }
    }

    /// Loads the session stored under `handle` and replaces the live session with it.
    ///
    /// A session whose filters violate current invariants still loads; the
    /// violations are returned in [`LoadOutcome::warnings`] and published as
    /// `SessionLoadedWithWarnings`.
    ///
    /// # Errors
    ///
    /// - `OperationInProgress` if another search, load or save is active
    /// - `SessionLoadError` if the repository cannot provide the document
    /// - `SessionParseError` if the document cannot be parsed
    pub async fn load_session(&self, handle: &str) -> Result<LoadOutcome> {
        let guard = PhaseGuard::begin(&self.phase, ControllerPhase::Loading)?;
        info!(handle, "Loading session");

        let result = match self.repository.load(handle).await {
            Ok(serialized) => self.apply_serialized(&serialized).await,
            Err(e) => Err(QueryError::SessionLoadError {
                message: e.to_string(),
            }),
        };
        drop(guard);

        self.publish_load(Some(handle), result)
    }

    /// Replaces the live session with one parsed from `serialized`.
    ///
    /// Same semantics as [`QueryController::load_session`] without the repository.
    pub async fn restore_session(&self, serialized: &str) -> Result<LoadOutcome> {
        let guard = PhaseGuard::begin(&self.phase, ControllerPhase::Loading)?;
        let result = self.apply_serialized(serialized).await;
        drop(guard);

        self.publish_load(None, result)
    }

    pub async fn list_sessions(&self) -> Result<Vec<String>> {
        self.repository.list().await
    }

    pub async fn delete_session(&self, handle: &str) -> Result<()> {
        self.repository.delete(handle).await?;
        info!(handle, "Session deleted");
        Ok(())
    }

    /// Parses a document and swaps it in. Publishes nothing.
    async fn apply_serialized(
        &self,
        serialized: &str,
    ) -> Result<(SessionDocument, LoadOutcome)> {
        let document = self.codec.decode(serialized).map_err(|e| match e {
            QueryError::SessionParseError { .. } => e,
            other => QueryError::session_parse(other.to_string()),
        })?;

        let candidate = SessionState::from_document(document, &self.catalog)?;
        let warnings = candidate.filters.validate();
        let published = candidate.to_document();

        *self.live.write().await = candidate;
        Ok((published, LoadOutcome { warnings }))
    }

    fn publish_load(
        &self,
        handle: Option<&str>,
        result: Result<(SessionDocument, LoadOutcome)>,
    ) -> Result<LoadOutcome> {
        match result {
            Ok((document, outcome)) => {
                info!(
                    handle = ?handle,
                    features = document.features.len(),
                    warnings = outcome.warnings.len(),
                    "Session loaded"
                );
                self.notifier.notify(QueryEvent::StateReplaced { document });
                if !outcome.is_clean() {
                    self.notifier.notify(QueryEvent::SessionLoadedWithWarnings {
                        violations: outcome.warnings.clone(),
                    });
                }
                Ok(outcome)
            }
            Err(QueryError::SessionParseError { message }) => {
                warn!(handle = ?handle, error = %message, "Session document rejected");
                self.notifier.notify(QueryEvent::SessionParseError {
                    message: message.clone(),
                });
                Err(QueryError::SessionParseError { message })
            }
            Err(e) => {
                let message = match &e {
                    QueryError::SessionLoadError { message } => message.clone(),
                    other => other.to_string(),
                };
                warn!(handle = ?handle, error = %message, "Session load failed");
                self.notifier.notify(QueryEvent::SessionLoadError {
                    handle: handle.map(str::to_string),
                    message,
                });
                Err(e)
            }
        }
    }
}
