use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PreferencesResponse {
    /// Show volumes in milliliters instead of cups and spoons
    pub metric_volume: bool,
    /// Show masses in grams instead of pounds and ounces
    pub metric_mass: bool,
}

/// Omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub metric_volume: Option<bool>,
    pub metric_mass: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/users/me/preferences",
    tag = "users",
    responses(
        (status = 200, description = "Unit preferences of the caller", body = PreferencesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_preferences(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(PreferencesResponse {
        metric_volume: user.prefers_metric_volume,
        metric_mass: user.prefers_metric_mass,
    })
}

#[utoipa::path(
    put,
    path = "/api/users/me/preferences",
    tag = "users",
    request_body(content = UpdatePreferencesRequest, example = json!({"metric_volume": false})),
    responses(
        (status = 200, description = "Updated preferences", body = PreferencesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_preferences(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> impl IntoResponse {
    let metric_volume = request.metric_volume.unwrap_or(user.prefers_metric_volume);
    let metric_mass = request.metric_mass.unwrap_or(user.prefers_metric_mass);

    let mut conn = get_conn!(pool);

    let result = diesel::update(users::table.find(user.id))
        .set((
            users::prefers_metric_volume.eq(metric_volume),
            users::prefers_metric_mass.eq(metric_mass),
        ))
        .execute(&mut conn);

    if let Err(e) = result {
        return internal_error("Failed to update preferences", e);
    }

    (
        StatusCode::OK,
        Json(PreferencesResponse {
            metric_volume,
            metric_mass,
        }),
    )
        .into_response()
}
