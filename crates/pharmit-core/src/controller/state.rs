//! Controller phases, picking modes and the single-flight guard.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{QueryError, Result};
use crate::feature::{FeatureKind, Position};

/// What the controller is doing.
///
/// Search: `Idle -> Validating -> Dispatching -> Idle`.
/// Sessions: `Idle -> Loading -> Idle` and `Idle -> Saving -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    #[default]
    Idle,
    Validating,
    Dispatching,
    Loading,
    Saving,
}

/// What a pick in the 3D viewer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PickMode {
    /// Create a new feature at the picked location.
    #[default]
    Add,
    /// Move the feature at `index` to the picked location.
    Edit { index: usize },
}

/// A location the user picked in the viewer, with the feature kind it suggests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PharmacophoreCandidate {
    pub kind: FeatureKind,
    pub position: Position,
    /// Radius suggested by the viewer; the kind's default when absent.
    #[serde(default)]
    pub radius: Option<f64>,
}

impl PharmacophoreCandidate {
    pub fn new(kind: FeatureKind, position: impl Into<Position>) -> Self {
        Self {
            kind,
            position: position.into(),
            radius: None,
        }
    }
}

/// Holds the controller out of `Idle` for one operation.
///
/// Returns the phase to `Idle` when dropped, including when the owning
/// future is dropped mid-operation.
pub(crate) struct PhaseGuard<'a> {
    phase: &'a Mutex<ControllerPhase>,
}

impl<'a> PhaseGuard<'a> {
    /// Enters `next`, failing with `OperationInProgress` unless the controller is idle.
    pub(crate) fn begin(phase: &'a Mutex<ControllerPhase>, next: ControllerPhase) -> Result<Self> {
        let mut current = lock(phase);
        if *current != ControllerPhase::Idle {
            return Err(QueryError::OperationInProgress { active: *current });
        }
        *current = next;
        Ok(Self { phase })
    }

    pub(crate) fn advance(&self, next: ControllerPhase) {
        *lock(self.phase) = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *lock(self.phase) = ControllerPhase::Idle;
    }
}

/// Locks a std mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
