//! Viewer style preferences for the ligand, results and receptor.

mod model;

pub use model::{Role, StyleEntry, StyleId, VisualizationPrefs};
