pub mod login;
pub mod signup;

use crate::AppState;
use axum::routing::post;
use axum::Router;

/// Account endpoints (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
}
