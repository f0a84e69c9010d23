//! Conversion between session documents and their serialized form.

use super::model::SessionDocument;
use crate::error::Result;

/// Encodes and decodes the persisted form of a [`SessionDocument`].
///
/// Implementations own the wire schema, including its versioning.
pub trait SessionCodec: Send + Sync {
    fn encode(&self, document: &SessionDocument) -> Result<String>;

    /// Parses a serialized session, migrating older schemas forward.
    fn decode(&self, serialized: &str) -> Result<SessionDocument>;
}
