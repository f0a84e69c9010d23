//! Pharmacophore features of a query.
//!
//! - `model`: a single `Feature` (kind, position, radius, enabled flag)
//! - `set`: the ordered `FeatureSet` the user edits

mod model;
mod set;

pub use model::{Feature, FeatureKind, Position};
pub use set::FeatureSet;
