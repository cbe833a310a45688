//! AES-256-GCM envelope encryption
//!
//! Every call to [`SecretCipher::encrypt`] draws a fresh salt and IV, derives
//! a key from the passphrase with Argon2id, and seals the plaintext. The GCM
//! tag lets [`SecretCipher::decrypt`] detect a wrong passphrase or tampering.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use super::envelope::{Envelope, IV_LEN};
use super::key_derivation::{derive_key, generate_salt, KeyDerivationParams};
use super::SecretString;
use crate::error::{CoreError, DecryptionError, Result};

/// Passphrase-based envelope cipher with a fixed work factor
#[derive(Debug, Clone, Default)]
pub struct SecretCipher {
    params: KeyDerivationParams,
}

impl SecretCipher {
    /// Create a cipher bound to the given key derivation work factor
    pub fn new(params: KeyDerivationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KeyDerivationParams {
        &self.params
    }

    /// Encrypt plaintext under a passphrase
    ///
    /// # Arguments
    /// * `plaintext` - The data to encrypt
    /// * `passphrase` - The application passphrase
    ///
    /// # Returns
    /// A new envelope with its own salt and IV
    pub fn encrypt(&self, plaintext: &[u8], passphrase: &[u8]) -> Result<Envelope> {
        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, &self.params)?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CoreError::EncryptionError(e.to_string()))?;

        // Generate random IV (12 bytes for GCM)
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        // aes-gcm appends the auth tag to the ciphertext
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CoreError::EncryptionError(e.to_string()))?;

        Ok(Envelope::seal(&ciphertext, &salt, &iv))
    }

    /// Decrypt an envelope with a passphrase
    ///
    /// Fails with a [`DecryptionError`] for malformed fields, wrong lengths,
    /// a wrong passphrase, or a tampered envelope.
    pub fn decrypt(
        &self,
        envelope: &Envelope,
        passphrase: &[u8],
    ) -> std::result::Result<Vec<u8>, DecryptionError> {
        let decoded = envelope.decode()?;

        let key = derive_key(passphrase, &decoded.salt, &self.params)
            .map_err(|e| DecryptionError::KeyDerivation(e.to_string()))?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| DecryptionError::Authentication)?;

        let nonce = Nonce::from_slice(&decoded.iv);

        cipher
            .decrypt(nonce, decoded.ciphertext.as_slice())
            .map_err(|_| DecryptionError::Authentication)
    }

    /// Encrypt a UTF-8 secret
    pub fn encrypt_string(&self, plaintext: &str, passphrase: &[u8]) -> Result<Envelope> {
        self.encrypt(plaintext.as_bytes(), passphrase)
    }

    /// Decrypt an envelope that must hold a UTF-8 secret
    pub fn decrypt_string(
        &self,
        envelope: &Envelope,
        passphrase: &[u8],
    ) -> std::result::Result<SecretString, DecryptionError> {
        let plaintext = self.decrypt(envelope, passphrase)?;
        match String::from_utf8(plaintext) {
            Ok(value) => Ok(SecretString::new(value)),
            Err(e) => {
                e.into_bytes().zeroize();
                Err(DecryptionError::InvalidUtf8)
            }
        }
    }
}
