//! Query controller: the state machine that turns view commands into edits,
//! searches and session operations.
//!
//! # Module Structure
//!
//! - `state`: `ControllerPhase`, `PickMode`, `PharmacophoreCandidate`
//! - `query_controller`: `QueryController`, `LoadOutcome` and `SaveOutcome`

mod query_controller;
mod state;


pub use query_controller::{LoadOutcome, QueryController, SaveOutcome};
pub use state::{ControllerPhase, PharmacophoreCandidate, PickMode};
