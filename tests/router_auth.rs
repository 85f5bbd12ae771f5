//! Router-level gate behavior that must hold before any handler or
//! database work: bearer presence, signature, expiry, and input
//! validation on the public surface.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, lazy_state, test_jwt_config, with_conn_info};
use lectern::config::jwt::JwtConfig;
use lectern::modules::users::model::Role;
use lectern::router::init_router;
use lectern::utils::jwt::issue_token;

#[tokio::test]
async fn missing_bearer_is_unauthenticated_before_any_handler() {
    let app = init_router(lazy_state());

    for uri in [
        "/api/root/users",
        "/api/professor/courses",
        "/api/student/courses",
        "/api/auth/me",
    ] {
        let response = app
            .clone()
            .oneshot(
                with_conn_info(Request::builder().uri(uri).body(Body::empty()).unwrap()),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthenticated");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("missing authorization"),
            "unexpected message for {}: {}",
            uri,
            body["message"]
        );
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = init_router(lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/root/users")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn malformed_token_is_unauthenticated() {
    let app = init_router(lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/professor/courses")
                .header(header::AUTHORIZATION, "Bearer not.a.credential")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthenticated");
    assert_eq!(body["message"], "invalid token");
}

#[tokio::test]
async fn expired_token_is_distinguished_from_malformed() {
    // Sign with the right secret but an expiry far in the past.
    let expired_config = JwtConfig {
        expiry_secs: -7200,
        ..test_jwt_config()
    };
    let token = issue_token(1, "old@test.example", Role::Student, &expired_config).unwrap();

    let app = init_router(lazy_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/student/courses")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "token has expired");
}

#[tokio::test]
async fn register_rejects_the_root_role() {
    let app = init_router(lazy_state());

    let response = app
        .oneshot(with_conn_info(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "full_name": "Mallory",
                        "email": "mallory@test.example",
                        "password": "longenough",
                        "role": "root"
                    })
                    .to_string(),
                ))
                .unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn register_validates_input_before_touching_the_store() {
    let app = init_router(lazy_state());

    // Bad email.
    let response = app
        .clone()
        .oneshot(with_conn_info(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "full_name": "Ada",
                        "email": "not-an-email",
                        "password": "longenough",
                        "role": "student"
                    })
                    .to_string(),
                ))
                .unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing password field.
    let response = app
        .oneshot(with_conn_info(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "ada@test.example"}).to_string(),
                ))
                .unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["message"], "password is required");
}

#[tokio::test]
async fn file_route_refuses_bad_tokens() {
    let app = init_router(lazy_state());

    // No token at all.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/files/submissions/1/2/report.pdf")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/files/submissions/1/2/report.pdf?token=junk")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "invalid download link");
}

#[tokio::test]
async fn signed_url_is_bound_to_its_key() {
    let state = lazy_state();
    use lectern::storage::ObjectStorage;
    let (url, _) = state.storage.signed_url("submissions/1/2/a.pdf").unwrap();
    let token = url.split("token=").nth(1).unwrap().to_string();

    let app = init_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/files/submissions/1/2/other.pdf?token={}",
                    token
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "download token does not match this file");
}
