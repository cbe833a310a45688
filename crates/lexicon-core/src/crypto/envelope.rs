//! Secret envelope wire format
//!
//! JSON shape: `{"ciphertext": <base64>, "salt": <base64>, "iv": <base64>}`
//! - salt: 16 bytes, fresh per envelope
//! - iv: 12 bytes (96 bits) - standard for GCM, fresh per envelope
//! - ciphertext: AES-256-GCM output with the 16-byte auth tag appended

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecryptionError;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// IV length in bytes
pub const IV_LEN: usize = 12;
/// GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Encrypted secret with the salt and IV needed to open it.
///
/// Fields are private so an envelope cannot be edited after creation;
/// re-encrypting a secret always produces a new envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    ciphertext: String,
    salt: String,
    iv: String,
}

/// Envelope fields decoded to bytes and length-checked
pub(crate) struct DecodedEnvelope {
    pub ciphertext: Vec<u8>,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
}

impl Envelope {
    /// Build an envelope from raw cipher output
    pub(crate) fn seal(ciphertext: &[u8], salt: &[u8; SALT_LEN], iv: &[u8; IV_LEN]) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            salt: STANDARD.encode(salt),
            iv: STANDARD.encode(iv),
        }
    }

    /// Build an envelope from already-encoded wire fields.
    ///
    /// No validation happens here; malformed fields surface as a
    /// [`DecryptionError`] when the envelope is opened.
    pub fn from_parts(
        ciphertext: impl Into<String>,
        salt: impl Into<String>,
        iv: impl Into<String>,
    ) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            salt: salt.into(),
            iv: iv.into(),
        }
    }

    /// Recognize an envelope in an arbitrary JSON value.
    ///
    /// Returns `None` unless all three fields are present as strings.
    pub fn from_json_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| object.get(name).and_then(Value::as_str);

        Some(Self::from_parts(
            field("ciphertext")?,
            field("salt")?,
            field("iv")?,
        ))
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn iv(&self) -> &str {
        &self.iv
    }

    /// Decode and length-check all fields
    pub(crate) fn decode(&self) -> Result<DecodedEnvelope, DecryptionError> {
        let salt_bytes = decode_field("salt", &self.salt)?;
        let iv_bytes = decode_field("iv", &self.iv)?;
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;

        let salt: [u8; SALT_LEN] =
            salt_bytes
                .as_slice()
                .try_into()
                .map_err(|_| DecryptionError::InvalidLength {
                    field: "salt",
                    expected: SALT_LEN,
                    actual: salt_bytes.len(),
                })?;

        let iv: [u8; IV_LEN] =
            iv_bytes
                .as_slice()
                .try_into()
                .map_err(|_| DecryptionError::InvalidLength {
                    field: "iv",
                    expected: IV_LEN,
                    actual: iv_bytes.len(),
                })?;

        if ciphertext.len() < TAG_LEN {
            return Err(DecryptionError::Truncated);
        }

        Ok(DecodedEnvelope {
            ciphertext,
            salt,
            iv,
        })
    }
}

fn decode_field(field: &'static str, encoded: &str) -> Result<Vec<u8>, DecryptionError> {
    STANDARD
        .decode(encoded)
        .map_err(|_| DecryptionError::MalformedEncoding { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(len: usize) -> String {
        STANDARD.encode(vec![1u8; len])
    }

    #[test]
    fn test_from_json_value_requires_all_fields() {
        let full = json!({"ciphertext": "YQ==", "salt": "Yg==", "iv": "Yw=="});
        let envelope = Envelope::from_json_value(&full).unwrap();
        assert_eq!(envelope.ciphertext(), "YQ==");
        assert_eq!(envelope.salt(), "Yg==");
        assert_eq!(envelope.iv(), "Yw==");

        assert!(Envelope::from_json_value(&json!({"ciphertext": "YQ==", "salt": "Yg=="})).is_none());
        assert!(Envelope::from_json_value(&json!({"ciphertext": "YQ==", "salt": "Yg==", "iv": 3})).is_none());
        assert!(Envelope::from_json_value(&json!("sk-plain")).is_none());
    }

    #[test]
    fn test_wire_format_field_names() {
        let envelope = Envelope::from_parts("c", "s", "i");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"ciphertext": "c", "salt": "s", "iv": "i"}));
    }

    #[test]
    fn test_decode_rejects_short_salt() {
        let envelope = Envelope::from_parts(encoded(32), encoded(4), encoded(IV_LEN));
        let err = envelope.decode().err().unwrap();
        assert_eq!(
            err,
            DecryptionError::InvalidLength {
                field: "salt",
                expected: SALT_LEN,
                actual: 4
            }
        );
    }

    #[test]
    fn test_decode_rejects_short_iv() {
        let envelope = Envelope::from_parts(encoded(32), encoded(SALT_LEN), encoded(8));
        let err = envelope.decode().err().unwrap();
        assert_eq!(err.kind(), "invalid_length");
    }

    #[test]
    fn test_decode_rejects_truncated_ciphertext() {
        let envelope = Envelope::from_parts(encoded(4), encoded(SALT_LEN), encoded(IV_LEN));
        assert_eq!(envelope.decode().err(), Some(DecryptionError::Truncated));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let envelope = Envelope::from_parts("not base64!", encoded(SALT_LEN), encoded(IV_LEN));
        assert_eq!(
            envelope.decode().err(),
            Some(DecryptionError::MalformedEncoding {
                field: "ciphertext"
            })
        );
    }
}
