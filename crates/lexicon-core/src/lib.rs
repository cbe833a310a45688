//! # lexicon-core
//!
//! Credential protection for the Lexicon admin assistant:
//! - AES-256-GCM envelope encryption with Argon2id key derivation
//! - Credential union (absent / plaintext / sealed) and the store adapter
//!   that protects and reveals it
//! - User profile snapshot and non-secret settings

pub mod credential;
pub mod crypto;
pub mod error;
pub mod profile;
pub mod settings;

pub use credential::{CipherConfig, Credential, CredentialStore};
pub use crypto::{derive_key, Envelope, KeyDerivationParams, SecretCipher, SecretString};
pub use error::{CoreError, DecryptionError, Result};
pub use profile::UserProfile;
pub use settings::{AssistantSettings, Settings, SettingsManager, DEFAULT_MODEL};
