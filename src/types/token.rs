//! Token Types
//!
//! In-memory token instance and its claim-map form.

use serde_json::Value;

use crate::error::{redact_id, StorageError};
use crate::types::{ClaimMap, TokenKind};

/// Claim names stamped by the store rather than taken from input.
pub const KIND_CLAIM: &str = "kind";
pub const ISS_CLAIM: &str = "iss";
pub const JTI_CLAIM: &str = "jti";
pub const IAT_CLAIM: &str = "iat";
pub const EXP_CLAIM: &str = "exp";
pub const GRANT_ID_CLAIM: &str = "grantId";

/// A typed security token issued by the server.
///
/// Instances are built by [`crate::TokenFactory::construct`] or decoded from
/// storage; the claim map only ever holds keys whitelisted for `kind`.
#[derive(Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    jti: String,
    iat: i64,
    exp: i64,
    iss: String,
    claims: ClaimMap,
    consumed: Option<bool>,
}

impl Token {
    pub(crate) fn new(
        kind: TokenKind,
        jti: String,
        iat: i64,
        exp: i64,
        iss: String,
        claims: ClaimMap,
    ) -> Self {
        let consumed = kind.supports_consumption().then_some(false);
        Self {
            kind,
            jti,
            iat,
            exp,
            iss,
            claims,
            consumed,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Record identifier. Treat as a bearer secret.
    pub fn jti(&self) -> &str {
        &self.jti
    }

    pub fn iat(&self) -> i64 {
        self.iat
    }

    pub fn exp(&self) -> i64 {
        self.exp
    }

    pub fn iss(&self) -> &str {
        &self.iss
    }

    /// Whitelisted claims, without the stamped fields.
    pub fn claims(&self) -> &ClaimMap {
        &self.claims
    }

    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    pub fn grant_id(&self) -> Option<&str> {
        self.claims.get(GRANT_ID_CLAIM).and_then(Value::as_str)
    }

    /// `Some` only for kinds that support consumption.
    pub fn consumed(&self) -> Option<bool> {
        self.consumed
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.unwrap_or(false)
    }

    pub(crate) fn set_consumed(&mut self, consumed: bool) {
        if self.kind.supports_consumption() {
            self.consumed = Some(consumed);
        }
    }

    /// Check if the token has expired at `now` (epoch seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Remaining lifetime in seconds at `now`, saturating at zero.
    pub fn remaining_ttl(&self, now: i64) -> u64 {
        u64::try_from(self.exp - now).unwrap_or(0)
    }

    /// Full claim map: whitelisted claims plus the stamped identity and timing fields.
    ///
    /// `consumed` is not part of it; that flag lives on the storage record.
    pub fn payload(&self) -> ClaimMap {
        let mut payload = self.claims.clone();
        payload.insert(KIND_CLAIM.to_string(), Value::from(self.kind.name()));
        payload.insert(ISS_CLAIM.to_string(), Value::from(self.iss.clone()));
        payload.insert(JTI_CLAIM.to_string(), Value::from(self.jti.clone()));
        payload.insert(IAT_CLAIM.to_string(), Value::from(self.iat));
        payload.insert(EXP_CLAIM.to_string(), Value::from(self.exp));
        payload
    }

    /// Rebuild a token from a decoded payload stored under `id`.
    ///
    /// The payload must describe a `kind` token whose `jti` equals `id`.
    /// Single-use kinds come back unconsumed; the caller overlays the record flag.
    pub fn from_payload(id: &str, kind: TokenKind, mut payload: ClaimMap) -> Result<Self, StorageError> {
        let corrupt = |message: String| StorageError::CorruptedData {
            id: redact_id(id),
            message,
        };

        let stored_kind = take_string(&mut payload, KIND_CLAIM).map_err(corrupt)?;
        if stored_kind != kind.name() {
            return Err(corrupt(format!(
                "expected kind {}, found {}",
                kind, stored_kind
            )));
        }

        let jti = take_string(&mut payload, JTI_CLAIM).map_err(corrupt)?;
        if jti != id {
            return Err(corrupt("jti does not match record id".to_string()));
        }

        let iss = take_string(&mut payload, ISS_CLAIM).map_err(corrupt)?;
        let iat = take_i64(&mut payload, IAT_CLAIM).map_err(corrupt)?;
        let exp = take_i64(&mut payload, EXP_CLAIM).map_err(corrupt)?;

        let schema = kind.schema();
        payload.retain(|key, _| schema.allows(key));

        Ok(Self {
            kind,
            jti,
            iat,
            exp,
            iss,
            claims: payload,
            consumed: kind.supports_consumption().then_some(false),
        })
    }
}

fn take_string(payload: &mut ClaimMap, key: &str) -> Result<String, String> {
    match payload.remove(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(format!("{} is not a string", key)),
        None => Err(format!("missing {}", key)),
    }
}

fn take_i64(payload: &mut ClaimMap, key: &str) -> Result<i64, String> {
    match payload.remove(key) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| format!("{} is not an integer", key)),
        None => Err(format!("missing {}", key)),
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("jti", &redact_id(&self.jti))
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("iss", &self.iss)
            .field("claims", &self.claims)
            .field("consumed", &self.consumed)
            .finish()
    }
}
