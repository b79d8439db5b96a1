pub mod grant;
pub mod token_store;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

pub use token_store::{MemoryTokenStore, SqlTokenStore, TokenStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("invalid or expired bearer credential")]
    InvalidOrExpiredCredential,

    #[error("token store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

/// Decide whether a request presenting `presented` may proceed.
///
/// Runs a fresh store lookup every time; nothing is remembered between calls.
pub async fn authorize(store: &dyn TokenStore, presented: Option<&str>) -> Result<(), AuthError> {
    let candidate = presented.ok_or(AuthError::MissingCredential)?;
    if store.validate(candidate).await? {
        Ok(())
    } else {
        Err(AuthError::InvalidOrExpiredCredential)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Anything else (no header, another scheme, empty token) counts as no credential.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
