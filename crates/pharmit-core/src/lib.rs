//! Domain core of the pharmit query panel.
//!
//! Holds the editable query (features, filters, styles, vendor), the
//! controller that validates, dispatches and persists it, and the traits
//! through which it talks to search backends, session stores and the view.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod feature;
pub mod filter;
pub mod search;
pub mod session;
pub mod vendor;
pub mod visualization;

// Re-export common error type
pub use error::QueryError;

pub use catalog::QueryCatalog;
pub use controller::{
    ControllerPhase, LoadOutcome, PharmacophoreCandidate, PickMode, QueryController, SaveOutcome,
};
