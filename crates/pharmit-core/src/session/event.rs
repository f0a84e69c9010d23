//! Notifications published to the view layer.

use serde::{Deserialize, Serialize};

use super::model::SessionDocument;
use crate::filter::FilterViolation;
use crate::search::SearchResults;

/// Events the controller publishes after commands complete.
///
/// Failures are always published, never swallowed. A session replacement is
/// published as one `StateReplaced` event, never as per-field changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryEvent {
    /// A search was refused because filters violate their invariants.
    ValidationFailed { violations: Vec<FilterViolation> },
    /// The dispatch collaborator returned results.
    SearchCompleted { results: SearchResults },
    /// The dispatch collaborator reported an error.
    SearchFailed { vendor: String, message: String },
    /// A session was loaded but its filters violate current invariants.
    SessionLoadedWithWarnings { violations: Vec<FilterViolation> },
    /// A session document could not be parsed; live state is unchanged.
    SessionParseError { message: String },
    /// The persistence collaborator could not load a session.
    SessionLoadError {
        #[serde(default)]
        handle: Option<String>,
        message: String,
    },
    /// The session was stored.
    SessionSaved { handle: String },
    /// The session was stored but its filters violate their invariants.
    SessionSavedWithWarnings {
        handle: String,
        violations: Vec<FilterViolation>,
    },
    /// The session could not be stored; live state is unchanged.
    SessionSaveError { handle: String, message: String },
    /// The whole live state was replaced (load, new query, features loaded).
    StateReplaced { document: SessionDocument },
}

/// Receives controller notifications on behalf of the view.
pub trait ViewNotifier: Send + Sync {
    fn notify(&self, event: QueryEvent);
}
