//! Session domain module.
//!
//! This module contains the aggregate query state and the interfaces the
//! controller uses to persist it and report on it.
//!
//! # Module Structure
//!
//! - `model`: `SessionState` (live, catalog-bound) and `SessionDocument` (serializable)
//! - `codec`: `SessionCodec` trait for the persisted wire form
//! - `repository`: `SessionRepository` trait for storing documents by handle
//! - `event`: `QueryEvent` notifications and the `ViewNotifier` trait

mod codec;
mod event;
mod model;
mod repository;

pub use codec::SessionCodec;
pub use event::{QueryEvent, ViewNotifier};
pub use model::{SessionDocument, SessionState};
pub use repository::SessionRepository;
