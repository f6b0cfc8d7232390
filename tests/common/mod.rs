#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use rihua::modules::users::model::UserCredentials;
use rihua::modules::users::store::InMemoryCredentialStore;
use rihua::router::init_router;
use rihua::state::AppState;
use rihua_auth::Role;
use rihua_config::{JwtConfig, ServerConfig};
use rihua_core::password::hash_password_with_cost;

pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 2_592_000,
    }
}

fn user(id: &str, email: &str, roles: &[Role]) -> UserCredentials {
    UserCredentials {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: hash_password_with_cost(PASSWORD, 4).unwrap(),
        roles: roles.to_vec(),
        preferred_language: None,
        enabled: true,
        locked: false,
    }
}

pub fn test_users() -> Vec<UserCredentials> {
    vec![
        UserCredentials {
            preferred_language: Some("ja".to_string()),
            ..user("u-user", "user@rihua.test", &[Role::User])
        },
        user("u-business", "business@rihua.test", &[Role::Business]),
        user("u-admin", "admin@rihua.test", &[Role::Admin]),
        UserCredentials {
            enabled: false,
            ..user("u-disabled", "disabled@rihua.test", &[Role::User])
        },
        UserCredentials {
            locked: true,
            ..user("u-locked", "locked@rihua.test", &[Role::User])
        },
    ]
}

pub fn setup_state_with(server_config: ServerConfig) -> AppState {
    let store = InMemoryCredentialStore::new(test_users()).unwrap();
    AppState::new(&jwt_config(), server_config, Arc::new(store)).unwrap()
}

pub fn setup_state() -> AppState {
    setup_state_with(ServerConfig::default())
}

pub fn setup_app(state: &AppState) -> axum::Router {
    init_router(state.clone())
}

pub fn access_token(state: &AppState, subject: &str, roles: &[Role]) -> String {
    access_token_at(state, subject, roles, Utc::now())
}

pub fn access_token_at(
    state: &AppState,
    subject: &str,
    roles: &[Role],
    issued_at: DateTime<Utc>,
) -> String {
    state
        .issuer
        .issue_access_token(subject, &format!("{subject}@rihua.test"), roles, None, issued_at)
        .unwrap()
}

pub fn refresh_token(state: &AppState, subject: &str) -> String {
    state.issuer.issue_refresh_token(subject, Utc::now()).unwrap()
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    request("GET", uri, authorization)
}

pub fn request(method: &str, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
