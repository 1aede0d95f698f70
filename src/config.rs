//! Configuration constants and types for phrase-seal.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// AEAD algorithm name.
pub const ALGORITHM: &str = "AES-GCM";

/// Key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (128 bits).
pub const TAG_SIZE: usize = 16;

/// Operations a derived key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
}

/// Usage restriction applied to every key.
pub const KEY_USAGES: [KeyUsage; 2] = [KeyUsage::Encrypt, KeyUsage::Decrypt];

/// Base64 alphabet used for envelope text.
///
/// Producer and consumer must agree on it. The two alphabets differ only in
/// the characters for indices 62 and 63 (`+`/`/` versus `-`/`_`) and in
/// padding on output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    /// RFC 4648 standard alphabet, padded with `=`.
    Standard,
    /// RFC 4648 URL-safe alphabet, unpadded.
    #[default]
    UrlSafe,
}

impl Alphabet {
    /// Guess the alphabet of an envelope.
    ///
    /// Returns `UrlSafe` if the text contains `-` or `_`, `Standard` otherwise.
    /// The guess is one-sided: a URL-safe envelope that happens to contain
    /// neither character is reported as `Standard`. That only works out
    /// because both decoders accept the shared characters and either padding.
    pub fn detect(envelope: &str) -> Self {
        if envelope.contains(&Alphabet::UrlSafe.distinguishing_chars()[..]) {
            Alphabet::UrlSafe
        } else {
            Alphabet::Standard
        }
    }

    /// Characters that only this alphabet uses.
    pub fn distinguishing_chars(&self) -> [char; 2] {
        match self {
            Alphabet::Standard => ['+', '/'],
            Alphabet::UrlSafe => ['-', '_'],
        }
    }
}

/// Options for a [`StatefulCipher`](crate::StatefulCipher).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Whether the derived key may be exported as raw bytes.
    pub extractable: bool,

    /// Alphabet used when no explicit alphabet is passed.
    pub alphabet: Alphabet,
}

impl CipherConfig {
    /// Create a configuration with custom settings.
    pub fn new(extractable: bool, alphabet: Alphabet) -> Self {
        Self {
            extractable,
            alphabet,
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}
