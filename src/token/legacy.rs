//! Legacy Record Format
//!
//! Encodes a token as a header/payload/signature record where the payload is
//! base64url (unpadded) JSON of the full claim map. Header and signature are
//! opaque placeholders; nothing is signed at this layer.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{redact_id, StorageError};
use crate::types::{ClaimMap, StoredRecord, Token, TokenKind};

/// Fixed header of legacy records.
const LEGACY_HEADER: &str = r#"{"alg":"none","typ":"legacy"}"#;

/// Encode a claim map as base64url JSON.
pub fn encode_payload(payload: &ClaimMap) -> Result<String, StorageError> {
    let json = serde_json::to_vec(payload).map_err(|e| StorageError::WriteFailed {
        message: format!("payload serialization failed: {}", e),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a base64url JSON payload back into a claim map.
pub fn decode_payload(encoded: &str) -> Result<ClaimMap, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| format!("payload is not base64url: {}", e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("payload is not a JSON object: {}", e))
}

/// Legacy storage format codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyFormat;

impl LegacyFormat {
    /// Build the storage record for a token.
    pub fn encode(&self, token: &Token) -> Result<StoredRecord, StorageError> {
        Ok(StoredRecord {
            header: URL_SAFE_NO_PAD.encode(LEGACY_HEADER),
            payload: encode_payload(&token.payload())?,
            signature: String::new(),
            grant_id: token.grant_id().map(str::to_string),
            consumed: token.consumed(),
        })
    }

    /// Rebuild a token from the record stored under `id`.
    ///
    /// `consumed` is read from the record, never from the payload.
    pub fn decode(
        &self,
        id: &str,
        kind: TokenKind,
        record: &StoredRecord,
    ) -> Result<Token, StorageError> {
        let payload = decode_payload(&record.payload).map_err(|message| {
            StorageError::CorruptedData {
                id: redact_id(id),
                message,
            }
        })?;

        let mut token = Token::from_payload(id, kind, payload)?;
        if let Some(consumed) = record.consumed {
            token.set_consumed(consumed);
        }
        Ok(token)
    }
}
