//! Shared fixtures for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use obralink_api::auth::jwt::{generate_token, JwtConfig};
use obralink_api::config::{DispatchConfig, ServerConfig};
use obralink_api::router::build_app_router;
use obralink_api::state::AppState;
use obralink_db::models::user::{CreateUser, User};
use obralink_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        dispatch: DispatchConfig {
            default_country_code: "54".to_string(),
            app_base_url: "https://app.obralink.com".to_string(),
            landing_url: "https://obralink.com".to_string(),
        },
    }
}

/// Build the full application router with the production middleware stack,
/// using the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Sign an access token for a seeded user.
pub fn token_for(user: &User) -> String {
    generate_token(user.id, &user.role, &test_config().jwt).unwrap()
}

/// Insert a user with the given addresses and role.
pub async fn seed_user(
    pool: &PgPool,
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
    role: Option<&str>,
) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: name.to_string(),
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
            role: role.map(str::to_string),
        },
    )
    .await
    .unwrap()
}

/// GET without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

fn authed_request(method: Method, uri: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// GET with a Bearer token.
pub async fn authed_get(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(authed_request(Method::GET, uri, token, None))
        .await
        .unwrap()
}

/// POST a JSON body with a Bearer token.
pub async fn authed_post(app: Router, uri: &str, token: &str, body: &Value) -> Response {
    app.oneshot(authed_request(Method::POST, uri, token, Some(body)))
        .await
        .unwrap()
}

/// POST without a body, with a Bearer token.
pub async fn authed_post_empty(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(authed_request(Method::POST, uri, token, None))
        .await
        .unwrap()
}

/// PUT a JSON body with a Bearer token.
pub async fn authed_put(app: Router, uri: &str, token: &str, body: &Value) -> Response {
    app.oneshot(authed_request(Method::PUT, uri, token, Some(body)))
        .await
        .unwrap()
}

/// DELETE with a Bearer token.
pub async fn authed_delete(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(authed_request(Method::DELETE, uri, token, None))
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the JSON body in one step.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
