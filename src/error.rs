//! Error types for phrase-seal.

use thiserror::Error;

/// Result type alias for phrase-seal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while deriving keys or sealing/opening envelopes.
///
/// `Clone` so that a single failed derivation can be handed to every caller
/// awaiting it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Passphrase input is not valid text.
    #[error("Invalid passphrase: {0}")]
    Validation(String),

    /// Envelope is not text, uses characters outside the selected alphabet,
    /// or decodes to fewer bytes than a nonce.
    #[error("Malformed envelope: {0}")]
    Format(String),

    /// Tag verification failed (wrong key, tampered data or alphabet mismatch).
    #[error("Authentication failed: wrong key, tampered data or alphabet mismatch")]
    Authentication,

    /// The key or input is unusable for the AEAD algorithm.
    #[error("Crypto operation failed: {0}")]
    CryptoOperation(String),

    /// Raw export requested on a non-extractable key.
    #[error("Key is not extractable")]
    NotExtractable,

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Format(e.to_string())
    }
}
