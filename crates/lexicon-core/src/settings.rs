//! Application settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. The application
//! passphrase is never written here; see [`crate::credential::CipherConfig`].

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::crypto::KeyDerivationParams;
use crate::error::{CoreError, Result};

/// Default chat completion API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Model used when a profile has no preferred model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Completion service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantSettings {
    /// Base URL of the completion API (e.g., "https://api.openai.com/v1")
    pub api_base: String,
    /// Model used when the profile does not name one
    pub default_model: String,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl AssistantSettings {
    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Key derivation work factor for envelopes
    pub kdf: KeyDerivationParams,
    /// Completion service configuration
    pub assistant: AssistantSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            kdf: KeyDerivationParams::default(),
            assistant: AssistantSettings::default(),
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager
    ///
    /// Only a missing file falls back to defaults; an unreadable or malformed
    /// file is an error.
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Get the default configuration directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "lexicon-admin", "lexicon-assistant")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                CoreError::ConfigError("Could not determine config directory".to_string())
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            CoreError::ConfigError(format!("Invalid settings file {:?}: {}", path, e))
        })?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Get completion service settings
    pub fn get_assistant(&self) -> &AssistantSettings {
        &self.settings.assistant
    }

    /// Update completion service settings and save
    pub async fn update_assistant(&mut self, assistant: AssistantSettings) -> Result<()> {
        self.settings.assistant = assistant;
        self.save().await
    }

    /// Get key derivation work factor
    pub fn get_kdf(&self) -> &KeyDerivationParams {
        &self.settings.kdf
    }

    /// Update key derivation work factor and save.
    ///
    /// Envelopes sealed under the previous work factor can no longer be opened.
    pub async fn update_kdf(&mut self, kdf: KeyDerivationParams) -> Result<()> {
        self.settings.kdf = kdf;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path()).unwrap();

        let settings = manager.get();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.kdf, KeyDerivationParams::default());
        assert_eq!(settings.assistant.default_model, DEFAULT_MODEL);
        assert_eq!(
            settings.assistant.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
            manager.get_mut().assistant.timeout_secs = 15;
            manager.get_mut().kdf.time_cost = 5;
            manager.save().await.unwrap();
        }

        {
            let manager = SettingsManager::new(temp_dir.path()).unwrap();
            assert_eq!(manager.get_assistant().timeout_secs, 15);
            assert_eq!(manager.get_kdf().time_cost, 5);
        }
    }

    #[tokio::test]
    async fn test_update_assistant() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path()).unwrap();

        let assistant = AssistantSettings {
            api_base: "https://llm.internal.example/v1/".to_string(),
            default_model: "m-default".to_string(),
            timeout_secs: 30,
        };
        manager.update_assistant(assistant).await.unwrap();

        let reloaded = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(reloaded.get_assistant().default_model, "m-default");
        assert_eq!(
            reloaded.get_assistant().completions_url(),
            "https://llm.internal.example/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"assistant": {"defaultModel": "m2"}}"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get_assistant().default_model, "m2");
        assert_eq!(manager.get_assistant().api_base, DEFAULT_API_BASE);
        assert_eq!(manager.get_kdf(), &KeyDerivationParams::default());
    }

    #[tokio::test]
    async fn test_partial_kdf_keeps_configured_values() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"kdf": {"memoryCost": 19456, "timeCost": 2}, "assistant": {"apiBase": "https://llm.internal/v1"}}"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(
            manager.get_kdf(),
            &KeyDerivationParams {
                memory_cost: 19456,
                time_cost: 2,
                parallelism: KeyDerivationParams::default().parallelism,
            }
        );
        assert_eq!(manager.get_assistant().api_base, "https://llm.internal/v1");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"assistant": {"apiBase": "https://llm.internal/v1""#,
        )
        .unwrap();

        let result = SettingsManager::new(temp_dir.path());
        assert!(matches!(result, Err(CoreError::ConfigError(_))));

        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"kdf": {"timeCost": "three"}}"#,
        )
        .unwrap();
        assert!(SettingsManager::new(temp_dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_reset_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
        manager
            .update_kdf(KeyDerivationParams {
                memory_cost: 8192,
                time_cost: 1,
                parallelism: 1,
            })
            .await
            .unwrap();
        assert!(temp_dir.path().join("settings.json").exists());

        manager.reset().await.unwrap();
        assert!(!temp_dir.path().join("settings.json").exists());
        assert_eq!(manager.get(), &Settings::default());
    }
}
