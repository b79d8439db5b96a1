use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::grant::GrantError;
use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Grant(#[from] GrantError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("invalid request payload: {message}")]
    InvalidPayload { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPayload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::Grant(GrantError::UnsupportedGrantType) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "unsupported_grant_type",
                self.to_string(),
            ),
            AppError::Grant(GrantError::MalformedRequestBody(detail)) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "malformed_request_body",
                detail.clone(),
            ),
            // Missing and invalid credentials must look identical to the caller.
            AppError::Auth(AuthError::MissingCredential)
            | AppError::Auth(AuthError::InvalidOrExpiredCredential) => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_token",
                "Invalid or expired token".to_string(),
            ),
            AppError::Auth(AuthError::Store(e)) => {
                tracing::error!("Token store error: {}", e);
                internal()
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "not_found",
                what.to_string(),
            ),
            AppError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "bad_request",
                detail.clone(),
            ),
            AppError::InvalidPayload { status, message } => (
                *status,
                "invalid_request_error",
                "invalid_payload",
                message.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                internal()
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

fn internal() -> (StatusCode, &'static str, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal_server_error",
        "internal server error".to_string(),
    )
}
