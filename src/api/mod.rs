use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRequest, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::middleware::{bearer::require_bearer, headers};
use crate::AppState;

pub mod appointments;
pub mod oauth;
pub mod patients;
pub mod providers;
pub mod ui;

/// JSON body extractor whose rejections render through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Build the full application router.
///
/// `/oauth2/access_token`, `/` and `/health` are open. Every `/v2` and `/ui`
/// route sits behind [`require_bearer`].
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/v2/patients", post(patients::create_patient))
        .route("/v2/patients/search", post(patients::search_patients))
        .route("/v2/patients/:id", get(patients::get_patient))
        .route("/v2/providers", get(providers::list_providers))
        .route("/v2/locations", get(providers::list_locations))
        .route(
            "/v2/appointment_resources",
            get(providers::list_appointment_resources),
        )
        .route("/v2/visit_reasons", get(providers::list_visit_reasons))
        .route("/v2/appointments", post(appointments::create_appointment))
        .route(
            "/v2/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::cancel_appointment),
        )
        .route("/ui", get(ui::home))
        .route("/ui/patients", get(ui::patients))
        .route("/ui/appointments", get(ui::appointments))
        // route_layer: unknown paths stay 404 instead of turning into 401s
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/oauth2/access_token", post(oauth::access_token))
        .merge(protected)
        .fallback(fallback_404)
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(headers::request_id))
        .layer(middleware::from_fn(headers::security_headers))
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match allow_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods(methods)
            // AllowHeaders::any() is rejected alongside allow_credentials(true)
            .allow_headers([
                HeaderName::from_static("content-type"),
                HeaderName::from_static("authorization"),
                HeaderName::from_static("x-request-id"),
            ])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
    }
}

async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": state.config.api_title,
        "version": state.config.api_version,
        "endpoints": {
            "authentication": "/oauth2/access_token",
            "patients": "/v2/patients",
            "providers": "/v2/providers",
            "locations": "/v2/locations",
            "appointment_resources": "/v2/appointment_resources",
            "visit_reasons": "/v2/visit_reasons",
            "appointments": "/v2/appointments"
        },
        "ui": {
            "home": "/ui",
            "patients": "/ui/patients",
            "appointments": "/ui/appointments"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}
