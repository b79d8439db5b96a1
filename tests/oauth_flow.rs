//! Token issuance and the bearer gate, exercised through the HTTP router.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Duration;
use serde_json::json;

use common::{anonymous, authed, body_bytes, body_json, form_post, spawn_app};

#[tokio::test]
async fn test_issue_then_call_protected_route() {
    let app = spawn_app().await;

    let response = app
        .send(form_post(
            "/oauth2/access_token",
            "grant_type=refresh_token&refresh_token=dummy",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    let token = body["access_token"].as_str().unwrap();
    assert_eq!(token.len(), 64);

    let response = app.send(authed("GET", "/v2/providers", token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_expires_after_an_hour() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    app.clock.advance(Duration::seconds(3599));
    let response = app.send(authed("GET", "/v2/visit_reasons", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.clock.advance(Duration::seconds(2));
    let response = app.send(authed("GET", "/v2/visit_reasons", &token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn test_reissue_invalidates_previous_token() {
    let app = spawn_app().await;
    let first = app.issue_token().await;
    let second = app.issue_token().await;
    assert_ne!(first, second);

    let response = app.send(authed("GET", "/v2/locations", &first)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(authed("GET", "/v2/locations", &second)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_json_grant_is_accepted() {
    let app = spawn_app().await;

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/oauth2/access_token")
                .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(Body::from(
                    json!({"grant_type": "authorization_code"}).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["access_token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_malformed_json_grant_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/oauth2/access_token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "malformed_request_body");
}

#[tokio::test]
async fn test_unsupported_grant_type_issues_nothing() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(form_post("/oauth2/access_token", "grant_type=password"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "unsupported_grant_type");

    // The rejected request must not have replaced the live token.
    let response = app.send(authed("GET", "/v2/providers", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_and_invalid_credentials_look_identical() {
    let app = spawn_app().await;
    app.issue_token().await;

    let missing = app.send(anonymous("GET", "/v2/providers")).await;
    let invalid = app.send(authed("GET", "/v2/providers", "not-a-real-token")).await;

    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.headers()[header::WWW_AUTHENTICATE],
        invalid.headers()[header::WWW_AUTHENTICATE]
    );
    assert_eq!(body_bytes(missing).await, body_bytes(invalid).await);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(
            Request::builder()
                .uri("/v2/providers")
                .header(header::AUTHORIZATION, format!("Basic {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ui_requires_a_token() {
    let app = spawn_app().await;
    let response = app.send(anonymous("GET", "/ui/patients")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_open_routes_need_no_token() {
    let app = spawn_app().await;

    let response = app.send(anonymous("GET", "/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = app.send(anonymous("GET", "/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["endpoints"]["authentication"], "/oauth2/access_token");
}

#[tokio::test]
async fn test_unknown_path_is_not_found_not_unauthorized() {
    let app = spawn_app().await;
    let response = app.send(anonymous("GET", "/v3/nothing-here")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
