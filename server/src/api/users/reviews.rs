use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{recipes, user_recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cookbook_core::average_rating;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyReviewItem {
    pub recipe_id: i32,
    pub recipe_name: String,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyReviewsResponse {
    /// Mean of the caller's ratings (0 when there are none)
    pub average_rating: f64,
    pub reviews: Vec<MyReviewItem>,
}

#[utoipa::path(
    get,
    path = "/api/users/me/reviews",
    tag = "users",
    responses(
        (status = 200, description = "Reviews written by the caller, by recipe name", body = MyReviewsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_reviews(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<(i32, String, Option<f64>, Option<String>)> = match user_recipes::table
        .inner_join(recipes::table)
        .filter(user_recipes::user_id.eq(user.id))
        .filter(
            user_recipes::rating
                .is_not_null()
                .or(user_recipes::review.is_not_null()),
        )
        .order((recipes::name.asc(), recipes::id.asc()))
        .select((
            recipes::id,
            recipes::name,
            user_recipes::rating,
            user_recipes::review,
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => return internal_error("Failed to fetch reviews", e),
    };

    let reviews: Vec<MyReviewItem> = rows
        .into_iter()
        .map(|(recipe_id, recipe_name, rating, review)| MyReviewItem {
            recipe_id,
            recipe_name,
            rating,
            review,
        })
        .collect();

    let response = MyReviewsResponse {
        average_rating: average_rating(reviews.iter().filter_map(|r| r.rating)),
        reviews,
    };

    (StatusCode::OK, Json(response)).into_response()
}
