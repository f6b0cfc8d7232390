mod common;

use axum::http::{Method, StatusCode, header};
use chrono::{Duration, Utc};
use common::{
    access_token, access_token_at, bearer, body_json, get, refresh_token, request, setup_app,
    setup_state, setup_state_with,
};
use rihua::middleware::policy::{PolicyRule, Requirement, RoutePolicyTable};
use rihua_auth::{Claims, Role, TokenCodec, TokenKind};
use rihua_config::ServerConfig;
use tower::ServiceExt;

fn assert_challenge(response: &axum::response::Response, realm: &str) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        &format!("Bearer realm=\"{realm}\"")
    );
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let state = setup_state();

    let response = setup_app(&state)
        .oneshot(get("/api/v1/users/me", None))
        .await
        .unwrap();

    assert_challenge(&response, "Rihua API");
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(
        response.headers().get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
        "max-age=31536000; includeSubDomains"
    );

    let body = body_json(response).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["path"], "/api/v1/users/me");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_me_with_access_token() {
    let state = setup_state();
    let token = access_token(&state, "u1", &[Role::User, Role::Moderator]);

    let response = setup_app(&state)
        .oneshot(get("/api/v1/users/me", Some(&bearer(&token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert_eq!(
        response.headers().get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
        "max-age=31536000; includeSubDomains"
    );
    assert!(response.headers().get("x-request-id").is_some());

    let body = body_json(response).await;
    assert_eq!(body["id"], "u1");
    assert_eq!(body["email"], "u1@rihua.test");
    assert_eq!(body["roles"], serde_json::json!(["USER", "MODERATOR"]));
    assert_eq!(body["language"], "zh-CN");
}

#[tokio::test]
async fn test_refresh_token_never_authenticates() {
    let state = setup_state();
    let token = refresh_token(&state, "u1");
    assert!(state.validator.is_valid(&token));

    let response = setup_app(&state)
        .oneshot(get("/api/v1/users/me", Some(&bearer(&token))))
        .await
        .unwrap();

    assert_challenge(&response, "Rihua API");
}

#[tokio::test]
async fn test_unusable_credentials_are_anonymous() {
    let state = setup_state();
    let expired = access_token_at(
        &state,
        "u1",
        &[Role::Admin],
        Utc::now() - Duration::seconds(7200),
    );
    let foreign = TokenCodec::new(b"some-other-service-secret-of-enough-length")
        .unwrap()
        .encode(&Claims {
            sub: "u1".to_string(),
            kind: TokenKind::Access,
            roles: vec![Role::SuperAdmin],
            email: Some("u1@rihua.test".to_string()),
            language: None,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
            jti: "forged".to_string(),
        })
        .unwrap();
    let valid = access_token(&state, "u1", &[Role::User]);

    for authorization in [
        "Basic xyz==".to_string(),
        format!("bearer {valid}"),
        "Bearer ".to_string(),
        "Bearer not-a-token".to_string(),
        bearer(&expired),
        bearer(&foreign),
    ] {
        let response = setup_app(&state)
            .oneshot(get("/api/v1/users/me", Some(&authorization)))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{authorization}"
        );
    }
}

#[tokio::test]
async fn test_public_operational_endpoints() {
    let state = setup_state();

    let response = setup_app(&state)
        .oneshot(get("/actuator/health", Some("Bearer garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "status": "UP" }));

    let response = setup_app(&state)
        .oneshot(get("/actuator/info", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "rihua");

    let response = setup_app(&state)
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_is_admin_only() {
    let state = setup_state();

    let response = setup_app(&state)
        .oneshot(get("/actuator/metrics", None))
        .await
        .unwrap();
    assert_challenge(&response, "Rihua API");

    let user = access_token(&state, "u1", &[Role::User]);
    let response = setup_app(&state)
        .oneshot(get("/actuator/metrics", Some(&bearer(&user))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["path"], "/actuator/metrics");

    // No recorder is installed in tests, so an admin gets past the gate to a 503
    let admin = access_token(&state, "u2", &[Role::Admin]);
    let response = setup_app(&state)
        .oneshot(get("/actuator/metrics", Some(&bearer(&admin))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_public_listings_and_role_gated_writes() {
    let state = setup_state();
    let user = access_token(&state, "u1", &[Role::User]);
    let business = access_token(&state, "u2", &[Role::Business]);

    // Allowed through the gate, but no such route in this service
    let response = setup_app(&state)
        .oneshot(get("/api/v1/events/42", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = setup_app(&state)
        .oneshot(request("POST", "/api/v1/events", None))
        .await
        .unwrap();
    assert_challenge(&response, "Rihua API");

    let response = setup_app(&state)
        .oneshot(request("POST", "/api/v1/events", Some(&bearer(&user))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = setup_app(&state)
        .oneshot(request("POST", "/api/v1/events", Some(&bearer(&business))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_routes_require_authentication() {
    let state = setup_state();

    let response = setup_app(&state)
        .oneshot(get("/api/v1/does-not-exist", None))
        .await
        .unwrap();
    assert_challenge(&response, "Rihua API");

    let token = access_token(&state, "u1", &[]);
    let response = setup_app(&state)
        .oneshot(get("/api/v1/does-not-exist", Some(&bearer(&token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_realm_comes_from_configuration() {
    let state = setup_state_with(ServerConfig {
        realm: "Rihua Staging".to_string(),
        ..ServerConfig::default()
    });

    let response = setup_app(&state)
        .oneshot(get("/api/v1/users/me", None))
        .await
        .unwrap();

    assert_challenge(&response, "Rihua Staging");
}

#[tokio::test]
async fn test_custom_policy_table() {
    let state = setup_state().with_policy(RoutePolicyTable::new(vec![
        PolicyRule::for_method(Method::POST, "/auth/**", Requirement::Public),
        PolicyRule::any_method("/admin/**", Requirement::any_of(&[Role::Admin])),
    ]));
    let user = access_token(&state, "u1", &[Role::User]);
    let admin = access_token(&state, "u2", &[Role::Admin]);

    // Allowed requests fall through to the 404 fallback
    let cases = [
        (request("POST", "/auth/login", None), StatusCode::NOT_FOUND),
        (request("POST", "/admin/x", None), StatusCode::UNAUTHORIZED),
        (
            request("POST", "/admin/x", Some(&bearer(&user))),
            StatusCode::FORBIDDEN,
        ),
        (
            request("POST", "/admin/x", Some(&bearer(&admin))),
            StatusCode::NOT_FOUND,
        ),
    ];

    for (req, expected) in cases {
        let uri = req.uri().clone();
        let response = setup_app(&state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), expected, "{uri}");
    }
}
