//! Screening filters applied to a pharmacophore search.
//!
//! - `model`: `FilterConfig`, its settable `FilterField`s and the
//!   `FilterViolation`s reported at validation time

mod model;

pub use model::{FilterConfig, FilterField, FilterViolation, HitLimit, NO_HIT_LIMIT};
