pub mod preferences;
pub mod reviews;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .route("/me/reviews", get(reviews::list_my_reviews))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        preferences::get_preferences,
        preferences::update_preferences,
        reviews::list_my_reviews,
    ),
    components(schemas(
        preferences::PreferencesResponse,
        preferences::UpdatePreferencesRequest,
        reviews::MyReviewItem,
        reviews::MyReviewsResponse,
    ))
)]
pub struct ApiDoc;
