pub mod create;
pub mod get;
pub mod list;
pub mod review;
pub mod save;
pub mod search;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes).
///
/// Reads are public; writes take an `AuthUser` and reject anonymous callers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/saved", get(list::list_saved_recipes))
        .route("/search", post(search::search_recipes))
        .route("/{id}", get(get::get_recipe))
        .route("/{id}/save", post(save::toggle_saved))
        .route("/{id}/review", put(review::put_review))
        .route("/{id}/reviews", get(review::list_reviews))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        list::list_saved_recipes,
        get::get_recipe,
        save::toggle_saved,
        review::put_review,
        review::list_reviews,
        search::search_recipes,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::RecipeIngredientInput,
        create::CreateRecipeResponse,
        list::ListRecipesResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::RecipeIngredientView,
        save::SaveRecipeResponse,
        review::ReviewRequest,
        review::ReviewResponse,
        review::ReviewItem,
        review::ReviewsResponse,
        search::SearchRequest,
        search::AmountLimit,
    ))
)]
pub struct ApiDoc;
