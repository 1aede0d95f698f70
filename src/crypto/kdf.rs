//! Passphrase key derivation.
//!
//! The key is the SHA-256 digest of the UTF-8 passphrase bytes, imported
//! directly as AES-256-GCM key material. There is no salt and no work
//! factor: two parties holding the same passphrase derive the same key
//! without exchanging anything else.

use crate::config::{KeyUsage, ALGORITHM, KEY_SIZE, KEY_USAGES};
use crate::error::{Error, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 256-bit AES-GCM key restricted to encrypt/decrypt.
///
/// Immutable once created. The key bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
    #[zeroize(skip)]
    extractable: bool,
}

impl SymmetricKey {
    /// Import raw key material.
    pub fn import(bytes: &[u8], extractable: bool) -> Result<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            Error::CryptoOperation(format!(
                "invalid key length: expected {}, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self { bytes, extractable })
    }

    /// Export the raw key bytes. Fails unless the key was created extractable.
    pub fn export(&self) -> Result<[u8; KEY_SIZE]> {
        if !self.extractable {
            return Err(Error::NotExtractable);
        }
        Ok(self.bytes)
    }

    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &'static [KeyUsage] {
        &KEY_USAGES
    }

    pub fn permits(&self, usage: KeyUsage) -> bool {
        KEY_USAGES.contains(&usage)
    }

    pub(crate) fn material(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("extractable", &self.extractable)
            .field("usages", &KEY_USAGES)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a key from a passphrase.
pub async fn derive_key(passphrase: &str, extractable: bool) -> Result<SymmetricKey> {
    Sha256KeySource.derive(passphrase, extractable).await
}

/// Derive a key from passphrase bytes, which must be valid UTF-8.
pub async fn derive_key_from_utf8(passphrase: &[u8], extractable: bool) -> Result<SymmetricKey> {
    let passphrase = std::str::from_utf8(passphrase)
        .map_err(|e| Error::Validation(format!("passphrase is not UTF-8: {}", e)))?;
    derive_key(passphrase, extractable).await
}

/// Something that turns a passphrase into a key.
///
/// [`StatefulCipher`](crate::StatefulCipher) derives through this trait so
/// the derivation step can be replaced, e.g. by a counting stub in tests.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn derive(&self, passphrase: &str, extractable: bool) -> Result<SymmetricKey>;
}

/// Unsalted SHA-256 derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256KeySource;

#[async_trait]
impl KeySource for Sha256KeySource {
    async fn derive(&self, passphrase: &str, extractable: bool) -> Result<SymmetricKey> {
        debug!(algorithm = ALGORITHM, extractable, "deriving key from passphrase");

        let mut digest = Sha256::digest(passphrase.as_bytes());
        let key = SymmetricKey::import(digest.as_slice(), extractable);
        digest.as_mut_slice().zeroize();

        key
    }
}
