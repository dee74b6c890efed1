use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewUserRecipe;
use crate::schema::{user_recipes, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use cookbook_core::{average_rating, validate_rating};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::save::recipe_exists;

pub const MAX_REVIEW_LEN: usize = 500;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// 0 to 5
    pub rating: f64,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub recipe_id: i32,
    pub rating: f64,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewItem {
    pub username: String,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewsResponse {
    /// Mean of the ratings below (0 when there are none)
    pub average_rating: f64,
    pub reviews: Vec<ReviewItem>,
}

fn normalize_review(review: Option<&str>) -> Result<Option<&str>, String> {
    let review = review.map(str::trim).filter(|r| !r.is_empty());
    if let Some(text) = review {
        if text.chars().count() > MAX_REVIEW_LEN {
            return Err(format!(
                "Review must be at most {} characters",
                MAX_REVIEW_LEN
            ));
        }
    }
    Ok(review)
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/review",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Rating out of range or review too long", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_review(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    Json(request): Json<ReviewRequest>,
) -> impl IntoResponse {
    let rating = match validate_rating(request.rating) {
        Ok(r) => r,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let review = match normalize_review(request.review.as_deref()) {
        Ok(r) => r,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let mut conn = get_conn!(pool);

    match recipe_exists(&mut conn, id) {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    }

    let result = diesel::insert_into(user_recipes::table)
        .values(NewUserRecipe {
            user_id: user.id,
            recipe_id: id,
            saved: false,
            rating: Some(rating),
            review,
        })
        .on_conflict((user_recipes::user_id, user_recipes::recipe_id))
        .do_update()
        .set((
            user_recipes::rating.eq(Some(rating)),
            user_recipes::review.eq(review),
        ))
        .execute(&mut conn);

    if let Err(e) = result {
        return internal_error("Failed to store review", e);
    }

    (
        StatusCode::OK,
        Json(ReviewResponse {
            recipe_id: id,
            rating,
            review: review.map(str::to_string),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/reviews",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Reviews for the recipe, newest first", body = ReviewsResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn list_reviews(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match recipe_exists(&mut conn, id) {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    }

    let rows: Vec<(String, Option<f64>, Option<String>, DateTime<Utc>)> = match user_recipes::table
        .inner_join(users::table)
        .filter(user_recipes::recipe_id.eq(id))
        .filter(
            user_recipes::rating
                .is_not_null()
                .or(user_recipes::review.is_not_null()),
        )
        .order(user_recipes::updated_at.desc())
        .select((
            users::username,
            user_recipes::rating,
            user_recipes::review,
            user_recipes::updated_at,
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => return internal_error("Failed to fetch reviews", e),
    };

    let reviews: Vec<ReviewItem> = rows
        .into_iter()
        .map(|(username, rating, review, updated_at)| ReviewItem {
            username,
            rating,
            review,
            updated_at,
        })
        .collect();

    let response = ReviewsResponse {
        average_rating: average_rating(reviews.iter().filter_map(|r| r.rating)),
        reviews,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_review_blank_is_none() {
        assert_eq!(normalize_review(None), Ok(None));
        assert_eq!(normalize_review(Some("   ")), Ok(None));
    }

    #[test]
    fn test_normalize_review_trims() {
        assert_eq!(normalize_review(Some(" tasty ")), Ok(Some("tasty")));
    }

    #[test]
    fn test_normalize_review_length_limit() {
        let at_limit = "a".repeat(MAX_REVIEW_LEN);
        assert!(normalize_review(Some(&at_limit)).is_ok());

        let too_long = "a".repeat(MAX_REVIEW_LEN + 1);
        assert!(normalize_review(Some(&too_long)).is_err());
    }
}
