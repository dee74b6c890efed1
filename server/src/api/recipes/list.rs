use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::{contains_pattern, DbPool};
use crate::get_conn;
use crate::schema::{recipes, user_recipes};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Queryable, ToSchema)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    /// Preparation time in minutes
    pub prep_minutes: i32,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Only recipes whose name contains this text (case-insensitive)
    pub q: Option<String>,
}

pub type SummaryColumns = (recipes::id, recipes::name, recipes::prep_minutes, recipes::rating);

pub const SUMMARY_COLUMNS: SummaryColumns = (
    recipes::id,
    recipes::name,
    recipes::prep_minutes,
    recipes::rating,
);

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes ordered by name", body = ListRecipesResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = recipes::table.select(SUMMARY_COLUMNS).into_boxed();
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(recipes::name.ilike(contains_pattern(q)));
    }

    match query
        .order((recipes::name.asc(), recipes::id.asc()))
        .load::<RecipeSummary>(&mut conn)
    {
        Ok(rows) => (StatusCode::OK, Json(ListRecipesResponse { recipes: rows })).into_response(),
        Err(e) => internal_error("Failed to fetch recipes", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/saved",
    tag = "recipes",
    responses(
        (status = 200, description = "Recipes the caller has saved, ordered by name", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_saved_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match user_recipes::table
        .inner_join(recipes::table)
        .filter(user_recipes::user_id.eq(user.id))
        .filter(user_recipes::saved.eq(true))
        .select(SUMMARY_COLUMNS)
        .order((recipes::name.asc(), recipes::id.asc()))
        .load::<RecipeSummary>(&mut conn)
    {
        Ok(rows) => (StatusCode::OK, Json(ListRecipesResponse { recipes: rows })).into_response(),
        Err(e) => internal_error("Failed to fetch saved recipes", e),
    }
}
