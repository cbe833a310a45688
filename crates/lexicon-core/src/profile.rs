//! User profile snapshot as read from the account service

use serde::{Deserialize, Serialize};

use crate::credential::Credential;

/// Assistant-related profile attributes.
///
/// Owned by the account service; this crate only reads a snapshot per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub is_ai_assistant_enabled: bool,

    #[serde(default)]
    pub api_key: Credential,

    #[serde(default)]
    pub preferred_model_id: Option<String>,
}

impl UserProfile {
    /// Preferred model, ignoring blank values
    pub fn model_id(&self) -> Option<&str> {
        self.preferred_model_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
