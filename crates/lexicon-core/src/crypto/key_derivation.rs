//! Passphrase-based key derivation using Argon2id

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::envelope::SALT_LEN;
use super::MasterKey;
use crate::error::{CoreError, Result};

/// Parameters for Argon2id key derivation (the work factor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyDerivationParams {
    /// Memory cost in KiB (default: 65536 = 64MB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 256-bit key from a passphrase using Argon2id
///
/// # Arguments
/// * `passphrase` - The application passphrase
/// * `salt` - Raw salt bytes (use `generate_salt()` to create one)
/// * `params` - Key derivation work factor
///
/// # Returns
/// A 32-byte key suitable for AES-256 encryption
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    params: &KeyDerivationParams,
) -> Result<MasterKey> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length: 32 bytes = 256 bits
    )
    .map_err(|e| CoreError::KeyDerivationError(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key_bytes = [0u8; 32];
    argon2
        .hash_password_into(passphrase, salt, &mut key_bytes)
        .map_err(|e| CoreError::KeyDerivationError(e.to_string()))?;

    let key = MasterKey::new(key_bytes);
    key_bytes.zeroize();

    Ok(key)
}

#[cfg(test)]
pub(crate) fn test_params() -> KeyDerivationParams {
    KeyDerivationParams {
        memory_cost: 8192, // 8 MB (faster for testing)
        time_cost: 1,
        parallelism: 1,
    }
}
