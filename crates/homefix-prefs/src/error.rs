//! Error types for preference store operations.

use std::io;

use thiserror::Error;

/// Primary error type for preference store operations.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Section name did not match any known record section.
    #[error("unknown preference section '{section}'")]
    UnknownSection {
        /// Section name provided by the caller.
        section: String,
    },
    /// Field name did not exist in the target section.
    #[error("unknown field '{field}' in '{section}'")]
    UnknownField {
        /// Section where the unknown field was requested.
        section: String,
        /// Name of the unexpected field.
        field: String,
    },
    /// Value kind did not match the field's declared kind.
    #[error("field '{field}' expects a {expected} value")]
    FieldType {
        /// Wire name of the field.
        field: &'static str,
        /// Human-readable kind the field accepts.
        expected: &'static str,
    },
    /// Value had the right kind but violated a field constraint.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Wire name of the field.
        field: &'static str,
        /// Machine-readable reason for the rejection.
        reason: &'static str,
    },
    /// Section patch payload could not be decoded.
    #[error("invalid patch for section '{section}'")]
    InvalidPatch {
        /// Wire name of the section.
        section: &'static str,
        /// Decoder error detail.
        source: serde_json::Error,
    },
    /// Store configuration failed validation.
    #[error("invalid store configuration '{field}': {reason}")]
    InvalidConfig {
        /// Configuration field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Durable storage backend rejected an operation.
    #[error("storage {operation} failed for '{key}': {detail}")]
    Storage {
        /// Operation identifier (`write`, `remove`, ...).
        operation: &'static str,
        /// Storage key involved.
        key: String,
        /// Backend-provided detail.
        detail: String,
    },
    /// File system operation failed.
    #[error("filesystem operation '{operation}' failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// Serialising the record failed.
    #[error("failed to encode user record")]
    Encode {
        /// Source serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for preference store results.
pub type PrefsResult<T> = Result<T, PrefsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages_name_the_offending_input() {
        let unknown = PrefsError::UnknownField {
            section: "preferences".to_string(),
            field: "colour".to_string(),
        };
        assert_eq!(
            unknown.to_string(),
            "unknown field 'colour' in 'preferences'"
        );

        let kind = PrefsError::FieldType {
            field: "darkMode",
            expected: "boolean",
        };
        assert_eq!(kind.to_string(), "field 'darkMode' expects a boolean value");
    }

    #[test]
    fn io_errors_expose_their_source() {
        let err = PrefsError::Io {
            operation: "slot.write",
            source: io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "filesystem operation 'slot.write' failed");
    }
}
