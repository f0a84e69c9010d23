//! Error types for the pharmit query panel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::ControllerPhase;
use crate::filter::{FilterField, FilterViolation};

/// A shared error type for the query panel core.
///
/// Every variant is recoverable at the granularity of a single operation:
/// a rejected edit leaves the previous valid state in place, and a failed
/// search or save leaves the editable session untouched.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryError {
    /// A feature violated its invariants (positive radius, finite position).
    #[error("Invalid feature: {reason}")]
    InvalidFeature { reason: String },

    /// A feature index did not address an existing feature.
    #[error("Feature index {index} out of range ({len} features)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A filter value failed the type or range check of its field.
    #[error("Invalid value {value} for filter '{field}': {reason}")]
    InvalidFilterValue {
        field: FilterField,
        value: f64,
        reason: String,
    },

    /// A visualization role name was not one of Ligand, Results, Receptor.
    #[error("Unknown visualization role: {role}")]
    UnknownRole { role: String },

    /// A style id did not index into the palette.
    #[error("Unknown style {style} (palette has {palette_len} entries)")]
    UnknownStyle { style: usize, palette_len: usize },

    /// A vendor name was not in the list of available vendors.
    #[error("Unknown vendor: {name}")]
    UnknownVendor { name: String },

    /// A search, load, save or reset was requested while another was active.
    #[error("Operation in progress: controller is {active}")]
    OperationInProgress { active: ControllerPhase },

    /// The filter configuration violated its invariants at search time.
    #[error("Validation failed ({} violations)", .violations.len())]
    ValidationFailed { violations: Vec<FilterViolation> },

    /// A session document could not be parsed into a session.
    #[error("Session parse error: {message}")]
    SessionParseError { message: String },

    /// The session persistence collaborator failed to load a document.
    #[error("Session load error: {message}")]
    SessionLoadError { message: String },

    /// The session persistence collaborator failed to save a document.
    #[error("Session save error: {message}")]
    SessionSaveError { message: String },

    /// The search dispatch collaborator reported a failure.
    #[error("Search on {vendor} failed: {message}")]
    SearchFailed { vendor: String, message: String },

    /// A search backend could not be reached or answered with garbage.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidFeature error
    pub fn invalid_feature(reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            reason: reason.into(),
        }
    }

    /// Creates an InvalidFilterValue error
    pub fn invalid_filter_value(field: FilterField, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            field,
            value,
            reason: reason.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a SessionParseError
    pub fn session_parse(message: impl Into<String>) -> Self {
        Self::SessionParseError {
            message: message.into(),
        }
    }

    /// Creates a Dispatch error
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by another operation holding the controller
    pub fn is_operation_in_progress(&self) -> bool {
        matches!(self, Self::OperationInProgress { .. })
    }

    /// Check if this is a filter validation failure
    pub fn is_validation_failed(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Check if this error was raised by an input check on a single edit.
    ///
    /// Input errors never change state, so the view can keep the previous value.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFeature { .. }
                | Self::IndexOutOfRange { .. }
                | Self::InvalidFilterValue { .. }
                | Self::UnknownRole { .. }
                | Self::UnknownStyle { .. }
                | Self::UnknownVendor { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::not_found("file", err.to_string());
        }
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for QueryError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for QueryError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, QueryError>`.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_classified() {
        assert!(QueryError::invalid_feature("radius").is_input_error());
        assert!(QueryError::UnknownVendor {
            name: "Nope".to_string()
        }
        .is_input_error());
        assert!(!QueryError::session_parse("bad json").is_input_error());
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err: QueryError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_not_found());

        let err: QueryError = std::io::Error::other("disk full").into();
        assert!(matches!(err, QueryError::Io { .. }));
    }

    #[test]
    fn test_validation_failed_message_counts_violations() {
        let err = QueryError::ValidationFailed {
            violations: vec![FilterViolation::MolWeightRange {
                min: 300.0,
                max: 200.0,
            }],
        };
        assert!(err.is_validation_failed());
        assert_eq!(err.to_string(), "Validation failed (1 violations)");
    }
}
