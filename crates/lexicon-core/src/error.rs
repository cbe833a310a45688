//! Error types for lexicon-core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: {0}")]
    DecryptionError(#[from] DecryptionError),

    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),

    #[error("Refusing to protect an empty secret")]
    EmptySecret,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Reasons an envelope could not be opened
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("{field} is not valid base64")]
    MalformedEncoding { field: &'static str },

    #[error("invalid {field} length: expected {expected}, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("ciphertext is shorter than the authentication tag")]
    Truncated,

    #[error("authentication failed (wrong passphrase or tampered envelope)")]
    Authentication,

    #[error("decrypted secret is not valid UTF-8")]
    InvalidUtf8,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

impl DecryptionError {
    /// Short, stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedEncoding { .. } => "malformed_encoding",
            Self::InvalidLength { .. } => "invalid_length",
            Self::Truncated => "truncated",
            Self::Authentication => "authentication",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::KeyDerivation(_) => "key_derivation",
        }
    }
}
