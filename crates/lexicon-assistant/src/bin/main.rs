//! Lexicon Assistant CLI - administrative helper for protected API keys
//!
//! Seals API keys into envelopes for storage on a profile, checks that a
//! stored envelope still opens under the deployed passphrase, and runs a
//! one-off completion for a profile snapshot.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use lexicon_assistant::CompletionClient;
use lexicon_core::{
    credential::PASSPHRASE_ENV, CipherConfig, Credential, CredentialStore, Envelope,
    SecretString, SettingsManager, UserProfile,
};

/// Lexicon Assistant - protect and spend language-model API keys
#[derive(Parser, Debug)]
#[command(name = "lexicon-assistant")]
#[command(version)]
#[command(about = "Protect language-model API keys and run completions for Lexicon profiles")]
struct Args {
    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Application passphrase used to seal and open envelopes
    #[arg(long, global = true, env = PASSPHRASE_ENV, hide_env_values = true)]
    passphrase: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for an API key and print its envelope as JSON
    Protect,

    /// Check that an envelope opens, printing only a masked prefix
    Verify {
        /// Envelope JSON, or @path to a file containing it
        #[arg(long)]
        envelope: String,
    },

    /// Run a completion for a profile snapshot
    Complete {
        /// Path to the profile JSON from the account service
        #[arg(long)]
        profile: PathBuf,

        /// Prompt to send
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    let settings = SettingsManager::new(&config_dir)
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    let config = CipherConfig::new(args.passphrase, *settings.get_kdf())
        .map_err(|e| format!("Invalid cipher configuration: {}", e))?;
    let store = CredentialStore::new(config);

    match args.command {
        Command::Protect => {
            let api_key = SecretString::new(rpassword::prompt_password("API key: ")?);
            let envelope = store
                .protect(api_key.expose().trim())
                .map_err(|e| format!("Failed to protect API key: {}", e))?;

            info!("API key sealed into a new envelope");
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::Verify { envelope } => {
            let raw = match envelope.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)?,
                None => envelope.clone(),
            };
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| format!("Envelope is not valid JSON: {}", e))?;
            let envelope = Envelope::from_json_value(&value)
                .ok_or("JSON is not an envelope (needs ciphertext, salt and iv)")?;

            let revealed = store
                .reveal(&Credential::Sealed(envelope))
                .ok_or("Envelope could not be opened with the configured passphrase")?;
            println!("OK {}", revealed.masked());
        }
        Command::Complete { profile, prompt } => {
            let contents = std::fs::read_to_string(&profile)?;
            let profile: UserProfile = serde_json::from_str(&contents)
                .map_err(|e| format!("Invalid profile JSON: {}", e))?;

            let client = CompletionClient::initialize(&profile, &store, settings.get_assistant())
                .ok_or("Assistant is not available for this profile")?;

            let result = client
                .get_completion(&prompt)
                .await
                .map_err(|e| format!("Completion failed ({}): {}", e.kind(), e))?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
