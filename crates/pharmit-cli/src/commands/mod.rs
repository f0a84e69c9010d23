//! Command handlers for the `pharmit` binary.
//!
//! Every invocation opens the named session, applies one command through the
//! query controller and saves the result back.

pub mod catalog;
pub mod edit;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use pharmit_core::config::CatalogConfig;
use pharmit_core::session::QueryEvent;
use pharmit_core::QueryController;
use pharmit_execution::{ChannelNotifier, DryRunDispatcher};
use pharmit_infrastructure::{
    CatalogStore, FileSessionRepository, PharmitPaths, VersionedSessionCodec,
};

/// Session used when `--session` is not given.
pub const DEFAULT_SESSION: &str = "current";

/// The controller wired to file storage, plus the view side of its notifications.
pub struct Workbench {
    pub paths: PharmitPaths,
    pub catalog_store: CatalogStore,
    pub catalog_config: CatalogConfig,
    pub controller: QueryController,
    events: UnboundedReceiver<QueryEvent>,
}

impl Workbench {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let paths = PharmitPaths::new(data_dir).context("Failed to resolve the pharmit directory")?;
        let catalog_store = CatalogStore::from_paths(&paths);
        let catalog_config = catalog_store
            .load()
            .with_context(|| format!("Failed to load {}", catalog_store.path().display()))?;
        let catalog = catalog_config.clone().into_catalog()?;

        let (notifier, events) = ChannelNotifier::channel();
        let controller = QueryController::new(
            catalog.clone(),
            Arc::new(DryRunDispatcher::with_vendors(catalog.vendors().to_vec())),
            Arc::new(FileSessionRepository::default_location(&paths)),
            Arc::new(VersionedSessionCodec::new()),
            Arc::new(notifier),
        );

        Ok(Self {
            paths,
            catalog_store,
            catalog_config,
            controller,
            events,
        })
    }

    /// Loads `handle` into the controller.
    ///
    /// A missing session is an error unless `create_missing` is set, in which
    /// case the controller keeps its empty query.
    pub async fn open_session(&mut self, handle: &str, create_missing: bool) -> Result<()> {
        FileSessionRepository::validate_handle(handle)?;

        let exists = self
            .controller
            .list_sessions()
            .await?
            .iter()
            .any(|h| h == handle);

        if !exists {
            if create_missing {
                debug!(handle, "Starting new session");
                return Ok(());
            }
            bail!("No session named '{}' (run `pharmit new` first)", handle);
        }

        let result = self.controller.load_session(handle).await;
        self.report_events();
        result.with_context(|| format!("Failed to load session '{}'", handle))?;
        Ok(())
    }

    /// Saves the live session. Filter violations are reported but do not block the save.
    pub async fn save(&mut self, handle: &str) -> Result<()> {
        let result = self.controller.save_session(handle).await;
        self.report_events();
        result.with_context(|| format!("Failed to save session '{}'", handle))?;
        Ok(())
    }

    /// Prints pending warnings for the user; other events go to the log.
    pub fn report_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                QueryEvent::SessionLoadedWithWarnings { violations }
                | QueryEvent::SessionSavedWithWarnings { violations, .. } => {
                    for violation in violations {
                        eprintln!("warning: {}", violation);
                    }
                }
                QueryEvent::ValidationFailed { violations } => {
                    for violation in violations {
                        eprintln!("invalid: {}", violation);
                    }
                }
                other => debug!(event = ?other, "Query event"),
            }
        }
    }
}
