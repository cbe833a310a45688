//! Credential type definitions

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::crypto::{Envelope, SecretString};

/// Stored API key as it appears on a profile.
///
/// Wire form: `null` is [`Credential::Absent`], a JSON string is
/// [`Credential::Plaintext`], and an envelope object is [`Credential::Sealed`].
/// Any other shape carries no usable key and reads as `Absent`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    /// No key configured
    #[default]
    Absent,
    /// Raw key, not yet protected
    Plaintext(SecretString),
    /// Encrypted key
    Sealed(Envelope),
}

impl Credential {
    /// Interpret a JSON value from the account service
    pub fn from_json_value(value: &Value) -> Self {
        match value {
            Value::String(raw) => Self::Plaintext(SecretString::new(raw.clone())),
            Value::Object(_) => Envelope::from_json_value(value)
                .map(Self::Sealed)
                .unwrap_or(Self::Absent),
            _ => Self::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed(_))
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Plaintext(_) => "plaintext",
            Self::Sealed(_) => "sealed",
        }
    }
}

impl From<Envelope> for Credential {
    fn from(envelope: Envelope) -> Self {
        Self::Sealed(envelope)
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Plaintext(raw) => serializer.serialize_str(raw.expose()),
            Self::Sealed(envelope) => envelope.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(&value))
    }
}
