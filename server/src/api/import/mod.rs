pub mod spoonacular;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/import endpoints (mounted at /api/import)
pub fn router() -> Router<AppState> {
    Router::new().route("/spoonacular", post(spoonacular::import_spoonacular))
}

#[derive(OpenApi)]
#[openapi(
    paths(spoonacular::import_spoonacular),
    components(schemas(
        spoonacular::SpoonacularImportRequest,
        spoonacular::SpoonacularImportResponse,
        spoonacular::ImportedRecipeSummary,
    ))
)]
pub struct ApiDoc;
