use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewUserRecipe;
use crate::schema::{recipes, user_recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::{exists, not, select};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveRecipeResponse {
    pub recipe_id: i32,
    /// Saved state after the toggle
    pub saved: bool,
}

/// Whether recipe `id` exists.
pub fn recipe_exists(conn: &mut PgConnection, id: i32) -> QueryResult<bool> {
    select(exists(recipes::table.find(id))).get_result(conn)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/save",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Saved flag toggled", body = SaveRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_saved(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match recipe_exists(&mut conn, id) {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    }

    // First save creates the association; later calls flip it
    let saved: bool = match diesel::insert_into(user_recipes::table)
        .values(NewUserRecipe {
            user_id: user.id,
            recipe_id: id,
            saved: true,
            rating: None,
            review: None,
        })
        .on_conflict((user_recipes::user_id, user_recipes::recipe_id))
        .do_update()
        .set(user_recipes::saved.eq(not(user_recipes::saved)))
        .returning(user_recipes::saved)
        .get_result(&mut conn)
    {
        Ok(saved) => saved,
        Err(e) => return internal_error("Failed to update saved state", e),
    };

    tracing::debug!(recipe_id = id, user_id = %user.id, saved, "Toggled saved recipe");

    (
        StatusCode::OK,
        Json(SaveRecipeResponse {
            recipe_id: id,
            saved,
        }),
    )
        .into_response()
}
