pub mod auth;
pub mod testing;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Endpoints reachable without a token: signup, login and the health ping.
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", auth::router()).route(
        "/api/test/unauthed-ping",
        get(testing::unauthed_ping::unauthed_ping),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup::signup,
        auth::login::login,
        testing::unauthed_ping::unauthed_ping,
    ),
    components(schemas(
        auth::signup::SignupRequest,
        auth::signup::SignupResponse,
        auth::login::LoginRequest,
        auth::login::LoginResponse,
        testing::unauthed_ping::UnauthedPingResponse,
    ))
)]
pub struct ApiDoc;
