//! Token Store Error Types
//!
//! Layered error hierarchy for token construction, configuration and storage.

use thiserror::Error;

/// Root error type for the token store.
#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TokenStoreError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "TOKEN_STORE_CONFIG",
            Self::Token(TokenError::AlreadyConsumed { .. }) => "TOKEN_STORE_REPLAY",
            Self::Token(_) => "TOKEN_STORE_TOKEN",
            Self::Storage(StorageError::CorruptedData { .. }) => "TOKEN_STORE_CORRUPT",
            Self::Storage(_) => "TOKEN_STORE_STORAGE",
        }
    }

    /// Check whether this error signals a replayed single-use token.
    pub fn is_replay(&self) -> bool {
        matches!(self, Self::Token(TokenError::AlreadyConsumed { .. }))
    }

    /// Check whether a stored record exists but could not be decoded.
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::Storage(StorageError::CorruptedData { .. }))
    }

    /// Check if a caller could reasonably retry the operation.
    ///
    /// The store never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(StorageError::Unavailable { .. }))
    }
}

/// Configuration and programmer errors.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unknown token kind: {name}")]
    UnknownKind { name: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid issuer identifier: {issuer}")]
    InvalidIssuer { issuer: String },

    #[error("No adapter registered for {kind}")]
    AdapterNotRegistered { kind: String },
}

/// Token construction and lifecycle errors.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("{kind} requires an explicit expiresIn")]
    MissingExpiresIn { kind: String },

    #[error("{kind} expiresIn must be a positive number of seconds")]
    InvalidExpiresIn { kind: String },

    #[error("{kind} claim {claim} has an invalid value")]
    InvalidClaim { kind: String, claim: String },

    #[error("{kind} does not support consumption")]
    ConsumptionUnsupported { kind: String },

    #[error("Token already consumed (possible replay)")]
    AlreadyConsumed { jti: String },

    #[error("{kind} not found")]
    NotFound { kind: String, jti: String },
}

/// Storage adapter error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Delete failed: {message}")]
    DeleteFailed { message: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Corrupted record {id}: {message}")]
    CorruptedData { id: String, message: String },
}

/// Result type for token store operations.
pub type StoreResult<T> = Result<T, TokenStoreError>;

/// Shorten an identifier for log output and error-free display.
pub(crate) fn redact_id(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let replay = TokenStoreError::from(TokenError::AlreadyConsumed {
            jti: "abc".to_string(),
        });
        assert_eq!(replay.error_code(), "TOKEN_STORE_REPLAY");
        assert!(replay.is_replay());

        let corrupt = TokenStoreError::from(StorageError::CorruptedData {
            id: "abc".to_string(),
            message: "bad base64".to_string(),
        });
        assert_eq!(corrupt.error_code(), "TOKEN_STORE_CORRUPT");
        assert!(corrupt.is_corrupt_record());
        assert!(!corrupt.is_replay());
    }

    #[test]
    fn test_is_retryable() {
        assert!(TokenStoreError::from(StorageError::Unavailable {
            message: "down".to_string()
        })
        .is_retryable());
        assert!(!TokenStoreError::from(ConfigurationError::UnknownKind {
            name: "IdToken".to_string()
        })
        .is_retryable());
    }

    #[test]
    fn test_replay_message_hides_jti() {
        let error = TokenError::AlreadyConsumed {
            jti: "super-secret-identifier".to_string(),
        };
        assert!(!error.to_string().contains("super-secret-identifier"));
    }

    #[test]
    fn test_redact_id() {
        assert_eq!(redact_id("abcdefghijkl"), "abcdef...");
        assert_eq!(redact_id("ab"), "ab...");
    }
}
