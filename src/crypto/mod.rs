//! Cryptographic operations for phrase-seal.
//!
//! This module provides:
//! - SHA-256 passphrase key derivation
//! - AES-256-GCM authenticated encryption
//! - The base64 envelope codec

mod cipher;
pub mod envelope;
mod kdf;

pub use cipher::{decrypt, encrypt};
pub use kdf::{derive_key, derive_key_from_utf8, KeySource, Sha256KeySource, SymmetricKey};
