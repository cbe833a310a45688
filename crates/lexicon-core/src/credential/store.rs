//! Credential store adapter
//!
//! Owns the application passphrase and decides, per credential, whether it
//! needs decrypting. [`CredentialStore::reveal`] is the single place where a
//! credential is judged unusable; callers treat `None` as "assistant
//! disabled for this user".

use tracing::{debug, warn};

use super::types::Credential;
use crate::crypto::{Envelope, KeyDerivationParams, SecretCipher, SecretString};
use crate::error::{CoreError, Result};

/// Environment variable holding the application passphrase
pub const PASSPHRASE_ENV: &str = "LEXICON_APP_PASSPHRASE";

/// Deployment-time cipher configuration
#[derive(Debug, Clone)]
pub struct CipherConfig {
    /// Application passphrase shared by every install of a build
    pub passphrase: SecretString,
    /// Key derivation work factor
    pub kdf: KeyDerivationParams,
}

impl CipherConfig {
    /// Create a config from an explicit passphrase
    pub fn new(passphrase: impl Into<SecretString>, kdf: KeyDerivationParams) -> Result<Self> {
        let passphrase = passphrase.into();
        if passphrase.is_empty() {
            return Err(CoreError::ConfigError(
                "application passphrase must not be empty".to_string(),
            ));
        }
        Ok(Self { passphrase, kdf })
    }

    /// Read the passphrase from `LEXICON_APP_PASSPHRASE`
    pub fn from_env(kdf: KeyDerivationParams) -> Result<Self> {
        let passphrase = std::env::var(PASSPHRASE_ENV).map_err(|_| {
            CoreError::ConfigError(format!("{} environment variable not set", PASSPHRASE_ENV))
        })?;
        Self::new(passphrase, kdf)
    }
}

/// Protects and reveals profile API keys
#[derive(Debug, Clone)]
pub struct CredentialStore {
    cipher: SecretCipher,
    passphrase: SecretString,
}

impl CredentialStore {
    /// Create a store from deployment configuration
    pub fn new(config: CipherConfig) -> Self {
        Self {
            cipher: SecretCipher::new(config.kdf),
            passphrase: config.passphrase,
        }
    }

    /// Encrypt a raw API key into a new envelope
    pub fn protect(&self, plaintext_key: &str) -> Result<Envelope> {
        if plaintext_key.is_empty() {
            return Err(CoreError::EmptySecret);
        }

        let envelope = self
            .cipher
            .encrypt_string(plaintext_key, self.passphrase.expose().as_bytes())?;

        debug!("Protected credential into a new envelope");
        Ok(envelope)
    }

    /// Resolve a credential to its plaintext key.
    ///
    /// Decryption failures are logged by kind and come back as `None`.
    pub fn reveal(&self, credential: &Credential) -> Option<SecretString> {
        match credential {
            Credential::Absent => None,
            Credential::Plaintext(raw) => Some(raw.clone()),
            Credential::Sealed(envelope) => {
                match self
                    .cipher
                    .decrypt_string(envelope, self.passphrase.expose().as_bytes())
                {
                    Ok(secret) => Some(secret),
                    Err(e) => {
                        warn!(
                            error_kind = e.kind(),
                            "Stored credential could not be decrypted; treating as unavailable"
                        );
                        None
                    }
                }
            }
        }
    }

    /// Replace a plaintext credential with its sealed form before it is persisted
    pub fn seal(&self, credential: Credential) -> Result<Credential> {
        match credential {
            Credential::Plaintext(raw) => Ok(Credential::Sealed(self.protect(raw.expose())?)),
            other => Ok(other),
        }
    }
}
