//! Error types for settings resolution and provider migration.

use std::io;

use thiserror::Error;

/// Primary error type for settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A legacy provider server entry lacked a required field.
    #[error("missing required configuration field")]
    MissingField {
        /// Section containing the missing field.
        section: String,
        /// Name of the missing field.
        field: String,
        /// Position of the offending entry within its sequence.
        index: usize,
    },
    /// A legacy provider server entry carried an empty `id`.
    #[error("provider id must not be empty")]
    EmptyProviderId {
        /// Position of the offending server entry.
        index: usize,
    },
    /// Field contained a value of the wrong shape.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section that failed validation.
        section: String,
        /// Field that failed validation.
        field: String,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Email verification method value was invalid.
    #[error("invalid email verification method")]
    InvalidVerificationMethod {
        /// Method payload provided by the caller.
        value: String,
    },
    /// File system operation failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// Settings document could not be decoded.
    #[error("settings document could not be parsed")]
    Parse {
        /// Operation identifier.
        operation: &'static str,
        /// Source decoding error.
        source: serde_json::Error,
    },
}

/// Convenience alias for settings results.
pub type ConfigResult<T> = Result<T, ConfigError>;
