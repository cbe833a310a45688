//! Credential handling for the profile's API key

mod store;
mod types;

pub use store::{CipherConfig, CredentialStore, PASSPHRASE_ENV};
pub use types::*;
