use crate::db::DbPool;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::db::get_user_from_token;
use super::extractor::{bearer_token, AuthError};

/// Middleware that requires a valid auth token for all requests.
/// Apply this to routes that should be protected by default.
pub async fn require_auth(
    State(pool): State<Arc<DbPool>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(Some(token)) => token,
        Ok(None) => return AuthError::MissingHeader.into_response(),
        Err(e) => return e.into_response(),
    };

    if get_user_from_token(&pool, token).await.is_none() {
        return AuthError::InvalidToken.into_response();
    }

    next.run(request).await
}
