use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, AuthError};
use crate::errors::AppError;
use crate::models::token::mask;
use crate::AppState;

/// Middleware: every protected route goes through the token gate.
/// Both credential failures render as the same 401 with `WWW-Authenticate: Bearer`.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Owned copies: the request body is not Sync, so no borrow of `req`
    // may live across the store lookup.
    let presented = auth::bearer_credential(req.headers()).map(str::to_owned);
    let path = req.uri().path().to_owned();

    match auth::authorize(state.tokens.as_ref(), presented.as_deref()).await {
        Ok(()) => Ok(next.run(req).await),
        Err(AuthError::MissingCredential) => {
            tracing::warn!(%path, "missing bearer credential");
            Err(AuthError::MissingCredential.into())
        }
        Err(AuthError::InvalidOrExpiredCredential) => {
            // SECURITY: only ever log a masked form of the presented token
            tracing::warn!(
                %path,
                "invalid or expired bearer credential (provided: '{}')",
                mask(presented.as_deref().unwrap_or_default())
            );
            Err(AuthError::InvalidOrExpiredCredential.into())
        }
        Err(e) => Err(e.into()),
    }
}
