//! Envelope text codec.
//!
//! An envelope is `base64(nonce (12 bytes) || ciphertext || tag (16 bytes))`
//! with no separator or length prefix: the nonce length is fixed, so the
//! first 12 decoded bytes are always the nonce.

use crate::config::{Alphabet, NONCE_SIZE};
use crate::error::{Error, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

const STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn engine(alphabet: Alphabet) -> &'static GeneralPurpose {
    match alphabet {
        Alphabet::Standard => &STANDARD,
        Alphabet::UrlSafe => &URL_SAFE,
    }
}

/// Concatenate nonce and ciphertext-with-tag and encode them as text.
pub fn pack(nonce: &[u8; NONCE_SIZE], ciphertext: &[u8], alphabet: Alphabet) -> String {
    let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(ciphertext);

    engine(alphabet).encode(raw)
}

/// Decode envelope text into its nonce and ciphertext-with-tag.
pub fn unpack(envelope: &str, alphabet: Alphabet) -> Result<([u8; NONCE_SIZE], Vec<u8>)> {
    let mut raw = engine(alphabet).decode(envelope)?;
    if raw.len() < NONCE_SIZE {
        return Err(Error::Format(format!(
            "envelope decodes to {} bytes, need at least {}",
            raw.len(),
            NONCE_SIZE
        )));
    }

    let ciphertext = raw.split_off(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&raw);

    Ok((nonce, ciphertext))
}

/// Like [`unpack`], for envelopes received as raw bytes.
pub fn unpack_bytes(envelope: &[u8], alphabet: Alphabet) -> Result<([u8; NONCE_SIZE], Vec<u8>)> {
    let envelope = std::str::from_utf8(envelope)
        .map_err(|e| Error::Format(format!("envelope is not text: {}", e)))?;
    unpack(envelope, alphabet)
}
