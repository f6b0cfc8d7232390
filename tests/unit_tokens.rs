use std::sync::Arc;

use chrono::{Duration, Utc};
use rihua_auth::{CodecError, Role, TokenCodec, TokenIssuer, TokenKind, TokenValidator};
use rihua_config::JwtConfig;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret-key-that-is-long-enough".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 2_592_000,
    }
}

fn setup() -> (Arc<TokenCodec>, TokenIssuer, TokenValidator) {
    let codec = Arc::new(TokenCodec::from_config(&jwt_config()).unwrap());
    let issuer = TokenIssuer::new(codec.clone(), &jwt_config()).unwrap();
    let validator = TokenValidator::new(codec.clone());
    (codec, issuer, validator)
}

#[test]
fn test_access_token_scenario() {
    let (codec, issuer, validator) = setup();
    let issued = Utc::now();

    let token = issuer
        .issue_access_token("u1", "u1@rihua.test", &[Role::User], None, issued)
        .unwrap();

    let claims = codec.decode_at(&token, issued).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.roles, vec![Role::User]);
    assert!(claims.iat < claims.exp);
    assert_eq!(claims.exp - claims.iat, 3600);

    assert!(validator.is_valid_at(&token, issued));
    assert!(!validator.is_valid_at(&token, issued + Duration::seconds(3601)));
}

#[test]
fn test_round_trip_preserves_roles_and_language() {
    let (codec, issuer, _) = setup();
    let now = Utc::now();

    for (roles, language) in [
        (vec![], "zh-CN"),
        (vec![Role::User], "ja"),
        (vec![Role::SuperAdmin, Role::Business, Role::User], "en-US"),
    ] {
        let token = issuer
            .issue_access_token("subject", "s@rihua.test", &roles, Some(language), now)
            .unwrap();
        let claims = codec.decode_at(&token, now).unwrap();

        assert!(claims.is_access());
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.language.as_deref(), Some(language));
    }
}

#[test]
fn test_refresh_lifetime_matches_configuration() {
    let (codec, issuer, validator) = setup();
    let now = Utc::now();

    let token = issuer.issue_refresh_token("u1", now).unwrap();
    let claims = codec.decode_at(&token, now).unwrap();

    assert_eq!(claims.exp - claims.iat, 2_592_000);
    assert!(validator.is_refresh_token_at(&token, now));
    assert!(!validator.is_access_token_at(&token, now));
}

#[test]
fn test_tokens_from_other_deployments_are_invalid() {
    let (_, _, validator) = setup();
    let other = JwtConfig {
        secret: "a-completely-different-deployment-secret".to_string(),
        ..jwt_config()
    };
    let other_codec = Arc::new(TokenCodec::from_config(&other).unwrap());
    let other_issuer = TokenIssuer::new(other_codec, &other).unwrap();

    let token = other_issuer
        .issue_access_token("u1", "u1@rihua.test", &[Role::Admin], None, Utc::now())
        .unwrap();

    assert!(!validator.is_valid(&token));
    assert_eq!(validator.remaining_lifetime(&token), 0);
}

#[test]
fn test_missing_secret_is_weak_key() {
    let config = JwtConfig {
        secret: String::new(),
        ..jwt_config()
    };
    assert!(matches!(
        TokenCodec::from_config(&config),
        Err(CodecError::WeakKey { length: 0 })
    ));
}
