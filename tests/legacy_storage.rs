//! Legacy storage format: what each token kind hands to its adapter.

use serde_json::{json, Value};
use std::sync::Arc;

use oidc_token_store::{
    decode_payload, provider_config, Adapter, AdapterRegistry, ClaimMap, MockAdapter, MockClock,
    MockIdGenerator, TokenFactory, TokenKind, TokenParams, UpsertCall,
};

const ISSUER: &str = "https://op.example.com";
const NOW: i64 = 1_700_000_000;

struct Harness {
    factory: TokenFactory,
    adapters: Vec<(TokenKind, Arc<MockAdapter>)>,
}

impl Harness {
    fn new() -> Self {
        let adapters: Vec<(TokenKind, Arc<MockAdapter>)> = TokenKind::ALL
            .iter()
            .map(|kind| (*kind, Arc::new(MockAdapter::new())))
            .collect();

        let mut registry = AdapterRegistry::new();
        for (kind, adapter) in &adapters {
            let adapter: Arc<dyn Adapter> = adapter.clone();
            registry = registry.register(*kind, adapter);
        }

        let config = provider_config().issuer(ISSUER).build().unwrap();
        let factory = TokenFactory::with_components(
            config,
            Arc::new(registry),
            Arc::new(MockClock::new(NOW)),
            Arc::new(MockIdGenerator::new()),
        )
        .unwrap();

        Self { factory, adapters }
    }

    fn adapter(&self, kind: TokenKind) -> &MockAdapter {
        &self
            .adapters
            .iter()
            .find(|(k, _)| *k == kind)
            .unwrap()
            .1
    }

    fn only_upsert(&self, kind: TokenKind) -> UpsertCall {
        let calls = self.adapter(kind).get_upsert_history();
        assert_eq!(calls.len(), 1);
        calls.into_iter().next().unwrap()
    }
}

fn full_payload() -> ClaimMap {
    json!({
        "accountId": "account",
        "claims": {},
        "clientId": "client",
        "grantId": "grantid",
        "scope": "openid",
        "sid": "sid",
        "consumed": true,
        "acr": "acr",
        "amr": ["amr"],
        "authTime": NOW,
        "nonce": "nonce",
        "redirectUri": "https://rp.example.com/cb",
        "codeChallenge": "codeChallenge",
        "codeChallengeMethod": "codeChallengeMethod",
        "aud": ["client", "foo"],
    })
    .as_object()
    .unwrap()
    .clone()
}

/// Decode the upserted payload and split off the timing claims.
fn decoded(call: &UpsertCall) -> (i64, i64, Value) {
    let mut payload = decode_payload(&call.record.payload).unwrap();
    let iat = payload.remove("iat").unwrap().as_i64().unwrap();
    let exp = payload.remove("exp").unwrap().as_i64().unwrap();
    (iat, exp, Value::Object(payload))
}

#[tokio::test]
async fn test_access_token() {
    let harness = Harness::new();
    let token = harness
        .factory
        .construct(TokenKind::AccessToken, full_payload())
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::AccessToken);
    assert_eq!(call.id, jti);
    assert_eq!(call.record.grant_id.as_deref(), Some("grantid"));
    assert_eq!(call.record.consumed, None);

    let (iat, exp, payload) = decoded(&call);
    assert_eq!(exp - iat, 3600);
    assert_eq!(
        payload,
        json!({
            "accountId": "account",
            "claims": {},
            "clientId": "client",
            "aud": ["client", "foo"],
            "grantId": "grantid",
            "scope": "openid",
            "sid": "sid",
            "kind": "AccessToken",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_authorization_code() {
    let harness = Harness::new();
    let token = harness
        .factory
        .construct(TokenKind::AuthorizationCode, full_payload())
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::AuthorizationCode);
    assert_eq!(call.record.grant_id.as_deref(), Some("grantid"));
    // Single-use kinds always start unconsumed, whatever the input said.
    assert_eq!(call.record.consumed, Some(false));

    let (iat, exp, payload) = decoded(&call);
    assert_eq!(exp - iat, 600);
    assert_eq!(
        payload,
        json!({
            "acr": "acr",
            "codeChallenge": "codeChallenge",
            "codeChallengeMethod": "codeChallengeMethod",
            "amr": ["amr"],
            "authTime": NOW,
            "accountId": "account",
            "claims": {},
            "clientId": "client",
            "grantId": "grantid",
            "scope": "openid",
            "nonce": "nonce",
            "redirectUri": "https://rp.example.com/cb",
            "sid": "sid",
            "kind": "AuthorizationCode",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_refresh_token() {
    let harness = Harness::new();
    let token = harness
        .factory
        .construct(TokenKind::RefreshToken, full_payload())
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::RefreshToken);
    assert_eq!(call.record.consumed, Some(false));

    let (iat, exp, payload) = decoded(&call);
    assert_eq!(exp - iat, 14 * 24 * 3600);
    assert_eq!(
        payload,
        json!({
            "accountId": "account",
            "acr": "acr",
            "amr": ["amr"],
            "authTime": NOW,
            "claims": {},
            "clientId": "client",
            "grantId": "grantid",
            "nonce": "nonce",
            "scope": "openid",
            "sid": "sid",
            "kind": "RefreshToken",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_client_credentials() {
    let harness = Harness::new();
    let token = harness
        .factory
        .construct(TokenKind::ClientCredentials, full_payload())
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::ClientCredentials);
    assert_eq!(call.record.grant_id, None);
    assert_eq!(call.record.consumed, None);

    let (_, _, payload) = decoded(&call);
    assert_eq!(
        payload,
        json!({
            "clientId": "client",
            "scope": "openid",
            "aud": ["client", "foo"],
            "kind": "ClientCredentials",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_initial_access_token() {
    let harness = Harness::new();
    let mut input = full_payload();
    input.insert("expiresIn".to_string(), json!(100));

    let token = harness
        .factory
        .construct(TokenKind::InitialAccessToken, input)
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::InitialAccessToken);
    assert_eq!(call.expires_in, Some(100));

    let (iat, exp, payload) = decoded(&call);
    assert_eq!(exp - iat, 100);
    assert_eq!(
        payload,
        json!({
            "kind": "InitialAccessToken",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_registration_access_token() {
    let harness = Harness::new();
    let params = TokenParams::from_claims(full_payload()).expires_in(100);

    let token = harness
        .factory
        .construct(TokenKind::RegistrationAccessToken, params)
        .unwrap();
    let jti = harness.factory.save(&token).await.unwrap();

    let call = harness.only_upsert(TokenKind::RegistrationAccessToken);
    let (iat, exp, payload) = decoded(&call);
    assert_eq!(exp - iat, 100);
    assert_eq!(
        payload,
        json!({
            "clientId": "client",
            "kind": "RegistrationAccessToken",
            "iss": ISSUER,
            "jti": jti,
        })
    );
}

#[tokio::test]
async fn test_save_then_find_round_trips_every_kind() {
    let harness = Harness::new();

    for kind in TokenKind::ALL {
        let params = TokenParams::from_claims(full_payload()).expires_in(100);
        let token = harness.factory.construct(kind, params).unwrap();
        let jti = harness.factory.save(&token).await.unwrap();

        let found = harness.factory.find(kind, &jti).await.unwrap().unwrap();
        assert_eq!(found, token);
        assert_eq!(found.payload(), token.payload());
        assert_eq!(found.consumed().is_some(), kind.supports_consumption());
    }
}
