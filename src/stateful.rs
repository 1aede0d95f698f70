//! Long-lived cipher bound to one passphrase-derived key.
//!
//! Derivation is kicked off when the cipher is built and resolved lazily:
//! every caller that needs the key before it is cached awaits the same
//! shared derivation, and the first one to see it finish caches the key.

use crate::config::{Alphabet, CipherConfig};
use crate::crypto::{self, KeySource, Sha256KeySource, SymmetricKey};
use crate::error::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

type PendingKey = Shared<BoxFuture<'static, Result<SymmetricKey>>>;

enum KeyState {
    Pending(PendingKey),
    Ready(SymmetricKey),
}

/// Encrypts and decrypts with a key derived once from a passphrase.
pub struct StatefulCipher {
    state: Mutex<KeyState>,
    config: CipherConfig,
}

impl StatefulCipher {
    /// Start deriving a key from `passphrase` with SHA-256.
    pub fn new(passphrase: &str, config: CipherConfig) -> Self {
        Self::with_key_source(passphrase, config, Arc::new(Sha256KeySource))
    }

    /// Start deriving a key from `passphrase` through `source`.
    ///
    /// Inside a Tokio runtime the derivation is driven by a background task
    /// right away; elsewhere it runs on the first call that needs the key.
    pub fn with_key_source(
        passphrase: &str,
        config: CipherConfig,
        source: Arc<dyn KeySource>,
    ) -> Self {
        let passphrase = Zeroizing::new(passphrase.to_owned());
        let extractable = config.extractable;

        let pending = async move { source.derive(&passphrase, extractable).await }
            .boxed()
            .shared();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(pending.clone().map(|_| ()));
        }

        Self {
            state: Mutex::new(KeyState::Pending(pending)),
            config,
        }
    }

    /// Wrap an already derived key.
    pub fn from_key(key: SymmetricKey, config: CipherConfig) -> Self {
        Self {
            state: Mutex::new(KeyState::Ready(key)),
            config,
        }
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Whether the key has been cached.
    pub fn is_key_ready(&self) -> bool {
        matches!(*self.state.lock(), KeyState::Ready(_))
    }

    /// Get the key, waiting for derivation if needed.
    pub async fn key(&self) -> Result<SymmetricKey> {
        let pending = {
            let state = self.state.lock();
            match &*state {
                KeyState::Ready(key) => return Ok(key.clone()),
                KeyState::Pending(pending) => pending.clone(),
            }
        };

        let key = pending.await?;

        let mut state = self.state.lock();
        if let KeyState::Pending(_) = *state {
            debug!("caching derived key");
            *state = KeyState::Ready(key.clone());
        }

        Ok(key)
    }

    /// Encrypt with the configured alphabet.
    pub async fn encrypt(&self, plaintext: &str) -> Result<String> {
        self.encrypt_with(plaintext, self.config.alphabet).await
    }

    pub async fn encrypt_with(&self, plaintext: &str, alphabet: Alphabet) -> Result<String> {
        let key = self.key().await?;
        crypto::encrypt(&key, plaintext, alphabet).await
    }

    /// Decrypt with the configured alphabet.
    pub async fn decrypt(&self, sealed: &str) -> Result<String> {
        self.decrypt_with(sealed, self.config.alphabet).await
    }

    pub async fn decrypt_with(&self, sealed: &str, alphabet: Alphabet) -> Result<String> {
        let key = self.key().await?;
        crypto::decrypt(&key, sealed, alphabet).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;
    use crate::error::Error;
    use async_trait::async_trait;

    struct FailingSource;

    #[async_trait]
    impl KeySource for FailingSource {
        async fn derive(&self, _passphrase: &str, _extractable: bool) -> Result<SymmetricKey> {
            Err(Error::Validation("rejected".to_string()))
        }
    }

    #[tokio::test]
    async fn test_key_becomes_ready_after_first_use() {
        let cipher = StatefulCipher::new("passphrase", CipherConfig::default());
        assert!(!cipher.is_key_ready());

        cipher.key().await.unwrap();
        assert!(cipher.is_key_ready());
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let cipher = StatefulCipher::new("passphrase", CipherConfig::default());

        let sealed = cipher.encrypt("hello").await.unwrap();
        assert_eq!(cipher.decrypt(&sealed).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_uses_configured_alphabet() {
        let config = CipherConfig::new(false, Alphabet::Standard);
        let cipher = StatefulCipher::new("passphrase", config);

        let sealed = cipher.encrypt("hello").await.unwrap();
        let key = cipher.key().await.unwrap();

        assert_eq!(
            crypto::decrypt(&key, &sealed, Alphabet::Standard).await.unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn test_explicit_alphabet_overrides_config() {
        let cipher = StatefulCipher::new("passphrase", CipherConfig::default());

        let sealed = cipher.encrypt_with("hello", Alphabet::Standard).await.unwrap();
        let opened = cipher.decrypt_with(&sealed, Alphabet::Standard).await.unwrap();

        assert_eq!(opened, "hello");
    }

    #[tokio::test]
    async fn test_matches_free_functions() {
        let cipher = StatefulCipher::new("passphrase", CipherConfig::default());
        let key = derive_key("passphrase", false).await.unwrap();

        let sealed = crypto::encrypt(&key, "interop", Alphabet::UrlSafe).await.unwrap();
        assert_eq!(cipher.decrypt(&sealed).await.unwrap(), "interop");
    }

    #[tokio::test]
    async fn test_extractable_config() {
        let config = CipherConfig::new(true, Alphabet::UrlSafe);
        let cipher = StatefulCipher::new("passphrase", config);

        let key = cipher.key().await.unwrap();
        assert!(key.export().is_ok());
    }

    #[tokio::test]
    async fn test_from_key_starts_ready() {
        let key = derive_key("passphrase", false).await.unwrap();
        let cipher = StatefulCipher::from_key(key, CipherConfig::default());

        assert!(cipher.is_key_ready());
    }

    #[tokio::test]
    async fn test_failed_derivation_is_reported_every_time() {
        let cipher = StatefulCipher::with_key_source(
            "passphrase",
            CipherConfig::default(),
            Arc::new(FailingSource),
        );

        assert!(matches!(cipher.encrypt("x").await, Err(Error::Validation(_))));
        assert!(matches!(cipher.key().await, Err(Error::Validation(_))));
        assert!(!cipher.is_key_ready());
    }

    #[test]
    fn test_usable_without_runtime() {
        let cipher = StatefulCipher::new("passphrase", CipherConfig::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let sealed = runtime.block_on(cipher.encrypt("later")).unwrap();
        assert_eq!(runtime.block_on(cipher.decrypt(&sealed)).unwrap(), "later");
    }
}
