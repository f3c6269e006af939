//! Error types for AlgoeDB core.

use algoedb_codec::CodecError;
use algoedb_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in AlgoeDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration combination is not allowed.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// A record was rejected by the schema validator.
    #[error("record failed schema validation: {record}")]
    Validation {
        /// JSON rendering of the rejected record.
        record: String,
    },

    /// A query matched no records on an operation that requires a match.
    #[error("{operation}: no record matched the query")]
    NotFound {
        /// The operation that found nothing.
        operation: &'static str,
    },

    /// The persisted content could not be decoded.
    #[error("corrupt store at {location}: {message}")]
    CorruptStore {
        /// Where the content was read from.
        location: String,
        /// Description of the decoding failure.
        message: String,
    },

    /// Reading or durably replacing the backing file failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    /// The collection could not be encoded for persistence.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A regular expression failed to compile.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a not found error for `operation`.
    pub fn not_found(operation: &'static str) -> Self {
        Self::NotFound { operation }
    }

    /// Creates a corrupt store error.
    pub fn corrupt_store(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptStore {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a [`CoreError::Persistence`].
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_operation() {
        let err = CoreError::not_found("find_one");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "find_one: no record matched the query");
    }

    #[test]
    fn storage_errors_become_persistence() {
        let err: CoreError = StorageError::Injected("disk full".into()).into();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("disk full"));
    }
}
