//! Cryptographic primitives for protecting stored API keys
//!
//! This module provides:
//! - Argon2id key derivation from the application passphrase
//! - AES-256-GCM envelope encryption with per-envelope salt and IV
//! - Secure memory handling with zeroize

mod encryption;
mod envelope;
mod key_derivation;
mod secure_memory;

pub use encryption::SecretCipher;
pub use envelope::{Envelope, IV_LEN, SALT_LEN, TAG_LEN};
pub use key_derivation::{derive_key, generate_salt, KeyDerivationParams};
pub use secure_memory::{MasterKey, SecretString};

#[cfg(test)]
pub(crate) use key_derivation::test_params;
