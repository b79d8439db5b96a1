use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use bytes::Bytes;

use crate::auth::grant;
use crate::errors::AppError;
use crate::models::token::TokenResponse;
use crate::AppState;

/// POST /oauth2/access_token
/// Mint a new bearer token, replacing the old one.
///
/// The body is form-urlencoded or JSON depending on `Content-Type`. The
/// refresh token, if any, is accepted without being checked.
pub async fn access_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    let grant = grant::decode_grant(content_type, &body).map_err(|e| {
        tracing::warn!(content_type = content_type.unwrap_or("<none>"), "token request rejected: {}", e);
        e
    })?;
    tracing::debug!(
        grant_type = grant.grant_type.as_str(),
        has_refresh_token = grant.refresh_token.is_some(),
        "token request accepted"
    );

    let token = state.tokens.issue().await?;
    Ok(Json(TokenResponse::from(&token)))
}
