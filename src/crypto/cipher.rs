//! AES-256-GCM encryption of text into envelopes.

use crate::config::{Alphabet, NONCE_SIZE};
use crate::crypto::envelope;
use crate::crypto::kdf::SymmetricKey;
use crate::error::{Error, Result};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::trace;

/// AES-256-GCM cipher bound to one key.
struct Cipher {
    cipher: Aes256Gcm,
}

impl Cipher {
    fn new(key: &SymmetricKey) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.material())
            .map_err(|e| Error::CryptoOperation(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Returns the fresh nonce and ciphertext || tag.
    fn seal(&self, plaintext: &[u8]) -> Result<([u8; NONCE_SIZE], Vec<u8>)> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| Error::CryptoOperation(e.to_string()))?;

        Ok((nonce, ciphertext))
    }

    fn open(&self, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Authentication)
    }
}

/// Encrypt text under `key` with a fresh random nonce.
///
/// Two calls with the same key and plaintext give different envelopes.
pub async fn encrypt(key: &SymmetricKey, plaintext: &str, alphabet: Alphabet) -> Result<String> {
    let (nonce, ciphertext) = Cipher::new(key)?.seal(plaintext.as_bytes())?;
    let sealed = envelope::pack(&nonce, &ciphertext, alphabet);

    trace!(
        plaintext_len = plaintext.len(),
        envelope_len = sealed.len(),
        "sealed envelope"
    );
    Ok(sealed)
}

/// Decrypt an envelope produced by [`encrypt`] with the same alphabet.
///
/// A wrong key, tampered data and a mismatched alphabet that still decodes
/// all fail the same way, with [`Error::Authentication`].
pub async fn decrypt(key: &SymmetricKey, sealed: &str, alphabet: Alphabet) -> Result<String> {
    let (nonce, ciphertext) = envelope::unpack(sealed, alphabet)?;
    let plaintext = Cipher::new(key)?.open(&nonce, &ciphertext)?;

    trace!(envelope_len = sealed.len(), "opened envelope");

    // The tag covers the bytes we encrypted, which were always valid UTF-8.
    String::from_utf8(plaintext).map_err(|e| Error::CryptoOperation(e.to_string()))
}
