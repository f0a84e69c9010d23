//! Session persistence collaborator.
//!
//! Defines the interface for storing serialized sessions under a handle.

use async_trait::async_trait;

use crate::error::Result;

/// An abstract store of serialized session documents.
///
/// The repository never interprets the documents it stores; encoding and
/// decoding belong to a [`SessionCodec`](super::SessionCodec).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a serialized session under `handle`, replacing any previous one.
    async fn save(&self, handle: &str, serialized: &str) -> Result<()>;

    /// Reads the serialized session stored under `handle`.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The stored document
    /// - `Err(QueryError::NotFound)`: Nothing is stored under `handle`
    /// - `Err(_)`: Error occurred during retrieval
    async fn load(&self, handle: &str) -> Result<String>;

    /// Lists the stored handles in ascending order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Deletes the session stored under `handle`. Deleting a missing handle succeeds.
    async fn delete(&self, handle: &str) -> Result<()>;
}
