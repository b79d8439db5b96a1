#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use carecloud_mock::auth::SqlTokenStore;
use carecloud_mock::clock::ManualClock;
use carecloud_mock::config::Config;
use carecloud_mock::store::{seed, Store};
use carecloud_mock::{api, AppState};

pub struct TestApp {
    pub router: Router,
    pub clock: ManualClock,
    pub state: Arc<AppState>,
}

/// Seeded in-memory app whose token clock only moves when the test says so.
pub async fn spawn_app() -> TestApp {
    let db = Store::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    seed::create_seed_data(&db).await.unwrap();

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    let tokens = Arc::new(SqlTokenStore::new(db.pool().clone(), Arc::new(clock.clone())));
    let state = Arc::new(AppState::new(db, tokens, Config::default()).unwrap());

    TestApp {
        router: api::router(state.clone()),
        clock,
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issue a token through the HTTP endpoint using a form grant.
    pub async fn issue_token(&self) -> String {
        let response = self
            .send(form_post(
                "/oauth2/access_token",
                "grant_type=refresh_token&refresh_token=dummy",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn anonymous(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
