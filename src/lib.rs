//! Passphrase-sealed text envelopes
//!
//! Derives an AES-256-GCM key from a text passphrase and uses it to seal
//! short text values into compact base64 envelopes, and to open them again.
//!
//! # Features
//!
//! - **Deterministic keys**: SHA-256 of the passphrase, so parties sharing a
//!   passphrase interoperate without exchanging key material
//! - **AES-256-GCM**: a fresh random 96-bit nonce per message
//! - **Two alphabets**: standard or URL-safe base64 envelope text
//! - **Lazy stateful cipher**: one derivation shared by all concurrent callers
//!
//! # Envelope format
//!
//! ```text
//! base64( nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use phrase_seal::{CipherConfig, StatefulCipher};
//!
//! # async fn run() -> phrase_seal::Result<()> {
//! let cipher = StatefulCipher::new("correct horse battery staple", CipherConfig::default());
//!
//! let sealed = cipher.encrypt("attack at dawn").await?;
//! assert_eq!(cipher.decrypt(&sealed).await?, "attack at dawn");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod stateful;

pub use config::{Alphabet, CipherConfig, KeyUsage};
pub use crypto::{decrypt, derive_key, encrypt, SymmetricKey};
pub use error::{Error, Result};
pub use stateful::StatefulCipher;
