use crate::api::internal_error;
use crate::db::{contains_pattern, DbPool};
use crate::get_conn;
use crate::schema::ingredients;
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

const MAX_RESULTS: i64 = 20;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AutocompleteParams {
    /// Text the ingredient name should contain (case-insensitive)
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AutocompleteResult {
    /// Ingredient name
    pub value: String,
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AutocompleteResponse {
    pub matching_results: Vec<AutocompleteResult>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients/autocomplete",
    tag = "ingredients",
    params(AutocompleteParams),
    responses(
        (status = 200, description = "Up to 20 ingredients whose name contains the term", body = AutocompleteResponse)
    )
)]
pub async fn autocomplete(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<AutocompleteParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match ingredients::table
        .filter(ingredients::name.ilike(contains_pattern(params.term.trim())))
        .order(ingredients::name.asc())
        .limit(MAX_RESULTS)
        .select((ingredients::name, ingredients::id))
        .load::<(String, i32)>(&mut conn)
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(AutocompleteResponse {
                matching_results: rows
                    .into_iter()
                    .map(|(value, id)| AutocompleteResult { value, id })
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to search ingredients", e),
    }
}
