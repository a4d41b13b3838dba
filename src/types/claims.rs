//! Claim Types
//!
//! Caller-supplied claim maps and construction parameters.

use serde_json::{Map, Value};

/// Flat claim map, keyed by claim name.
pub type ClaimMap = Map<String, Value>;

/// Input key that carries an explicit lifetime instead of a claim.
pub const EXPIRES_IN_KEY: &str = "expiresIn";

/// Parameters for constructing a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenParams {
    /// Caller-supplied claims (may contain keys outside the kind's whitelist).
    pub claims: ClaimMap,
    /// Explicit lifetime in seconds, required by some kinds.
    pub expires_in: Option<u64>,
}

impl TokenParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parameters from a claim map.
    ///
    /// A numeric `expiresIn` entry is lifted out of the map and used as the
    /// explicit lifetime.
    pub fn from_claims(mut claims: ClaimMap) -> Self {
        let expires_in = match claims.remove(EXPIRES_IN_KEY) {
            Some(value) => value.as_u64(),
            None => None,
        };
        Self { claims, expires_in }
    }

    /// Set a single claim.
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    /// Set the explicit lifetime in seconds.
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

impl From<ClaimMap> for TokenParams {
    fn from(claims: ClaimMap) -> Self {
        Self::from_claims(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_claims_lifts_expires_in() {
        let claims = json!({ "clientId": "client", "expiresIn": 100 });
        let params = TokenParams::from_claims(claims.as_object().unwrap().clone());

        assert_eq!(params.expires_in, Some(100));
        assert!(!params.claims.contains_key(EXPIRES_IN_KEY));
        assert_eq!(params.claims.get("clientId"), Some(&json!("client")));
    }

    #[test]
    fn test_non_numeric_expires_in_is_ignored() {
        let claims = json!({ "expiresIn": "soon" });
        let params = TokenParams::from_claims(claims.as_object().unwrap().clone());
        assert_eq!(params.expires_in, None);
        assert!(params.claims.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let params = TokenParams::new()
            .claim("scope", "openid")
            .claim("aud", vec!["client", "foo"])
            .expires_in(30);

        assert_eq!(params.claims.len(), 2);
        assert_eq!(params.claims["aud"], json!(["client", "foo"]));
        assert_eq!(params.expires_in, Some(30));
    }
}
