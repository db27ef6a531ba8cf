//! Session-handle encryption.
//!
//! Implements AES-256-GCM authenticated encryption for the checkout session
//! cookie. The wire format is `base64(iv ∥ tag ∥ ciphertext)` with a fresh
//! 96-bit IV per call and a 128-bit authentication tag, so a tampered
//! payload fails authentication instead of decrypting to garbage.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// The size of the AES-256 key in bytes.
const KEY_SIZE: usize = 32;
/// The size of the AES-GCM nonce in bytes.
const NONCE_LEN: usize = 12;
/// The size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Error type for session-handle encryption.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Payload is not valid base64 or is too short to hold an IV and tag.
    #[error("malformed encrypted payload")]
    Malformed,

    /// Encryption failed.
    #[error("encryption failed")]
    Encrypt,

    /// Authentication tag did not verify.
    #[error("decryption failed")]
    Decrypt,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    NotUtf8,
}

/// Symmetric cipher for the session cookie, shared process-wide.
///
/// The key is initialized once at startup and never rotated during the
/// process lifetime.
#[derive(Clone)]
pub struct SessionCrypto {
    key: [u8; KEY_SIZE],
}

impl SessionCrypto {
    /// Build a cipher from configured key material.
    ///
    /// A 64-character hex value decodes to the raw 32-byte key; any other
    /// non-empty value is run through SHA-256 to derive one. When no key is
    /// configured a random key is generated, which means cookies written
    /// before a process restart become unreadable after one.
    #[must_use]
    pub fn from_key_material(material: Option<&str>) -> Self {
        match material {
            Some(hex_key) if hex_key.len() == 64 => {
                if let Ok(bytes) = hex::decode(hex_key) {
                    let mut key = [0u8; KEY_SIZE];
                    key.copy_from_slice(&bytes);
                    return Self { key };
                }
                // Not actually hex. Fall through to passphrase derivation.
                Self::from_passphrase(hex_key)
            }
            Some(passphrase) if !passphrase.is_empty() => Self::from_passphrase(passphrase),
            _ => {
                tracing::warn!(
                    "ENCRYPTION_KEY not set - using an ephemeral key, \
                     session cookies will not survive a restart"
                );
                let mut key = [0u8; KEY_SIZE];
                OsRng.fill_bytes(&mut key);
                Self { key }
            }
        }
    }

    /// Derive the key from a passphrase-style value.
    fn from_passphrase(passphrase: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(passphrase.as_bytes());
        let digest = hasher.finalize();
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt a session handle into a cookie-safe string.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));

        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        // aes-gcm appends the tag to the ciphertext; the wire format wants
        // iv || tag || ciphertext.
        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        let mut combined = Vec::with_capacity(NONCE_LEN + TAG_LEN + ciphertext.len());
        combined.extend_from_slice(&iv);
        combined.extend_from_slice(tag);
        combined.extend_from_slice(ciphertext);

        Ok(STANDARD.encode(&combined))
    }

    /// Decrypt a cookie payload back to the session handle.
    ///
    /// Fails closed on malformed base64, truncated payloads, or an
    /// authentication tag that does not verify.
    pub fn decrypt(&self, payload: &str) -> Result<String, CryptoError> {
        let combined = STANDARD.decode(payload).map_err(|_| CryptoError::Malformed)?;
        if combined.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Malformed);
        }

        let nonce = Nonce::from_slice(&combined[..NONCE_LEN]);
        let tag = &combined[NONCE_LEN..NONCE_LEN + TAG_LEN];
        let ciphertext = &combined[NONCE_LEN + TAG_LEN..];

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(nonce, sealed.as_slice())
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::NotUtf8)
    }
}
