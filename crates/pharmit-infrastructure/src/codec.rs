//! JSON session codec with schema migration.
//!
//! Documents are flat JSON objects carrying a top-level `version` field.
//! Older versions are migrated to the current schema on decode.

use version_migrate::Migrator;

use pharmit_core::error::{QueryError, Result};
use pharmit_core::session::{SessionCodec, SessionDocument};

use crate::dto::create_session_document_migrator;

const ENTITY: &str = "session_document";

/// [`SessionCodec`] backed by version-migrate.
pub struct VersionedSessionCodec {
    migrator: Migrator,
}

impl VersionedSessionCodec {
    pub fn new() -> Self {
        Self {
            migrator: create_session_document_migrator(),
        }
    }
}

impl Default for VersionedSessionCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCodec for VersionedSessionCodec {
    fn encode(&self, document: &SessionDocument) -> Result<String> {
        self.migrator
            .save_domain_flat(ENTITY, document.clone())
            .map_err(|e| QueryError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to serialize session: {}", e),
            })
    }

    fn decode(&self, serialized: &str) -> Result<SessionDocument> {
        let json_value: serde_json::Value = serde_json::from_str(serialized)
            .map_err(|e| QueryError::session_parse(format!("Invalid session JSON: {}", e)))?;

        if !json_value.is_object() {
            return Err(QueryError::session_parse(
                "Session document must be a JSON object",
            ));
        }

        self.migrator
            .load_flat_from(ENTITY, json_value)
            .map_err(|e| QueryError::session_parse(format!("Failed to migrate session: {}", e)))
    }
}
