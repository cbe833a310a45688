//! # lexicon-assistant
//!
//! Completion client for the Lexicon admin assistant. Reveals a profile's
//! protected API key and spends it against an OpenAI-style chat completion
//! endpoint, reporting every outcome through [`CompletionError`].

pub mod client;
pub mod error;
pub mod protocol;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use protocol::CompletionResult;
