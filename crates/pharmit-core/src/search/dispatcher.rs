//! Search dispatch collaborator.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{QuerySnapshot, SearchResults};

/// Sends a query snapshot to a vendor backend.
///
/// Owns the vendor wire format and any cancellation of in-flight requests.
#[async_trait]
pub trait SearchDispatcher: Send + Sync {
    /// Submits `snapshot` to `vendor` and resolves when the backend answers.
    ///
    /// # Returns
    ///
    /// - `Ok(SearchResults)`: The backend answered
    /// - `Err(_)`: Transport or backend failure
    async fn submit(&self, vendor: &str, snapshot: QuerySnapshot) -> Result<SearchResults>;
}
