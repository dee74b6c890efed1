use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

diesel::define_sql_function!(fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text);

/// Same message for unknown users and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Unknown username or wrong password", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let username = req.username.trim();
    let mut conn = get_conn!(pool);

    // Usernames are unique case-insensitively, so at most one row matches
    let user: Option<User> = match users::table
        .filter(lower(users::username).eq(username.to_lowercase()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(u) => u,
        Err(e) => return internal_error("Failed to look up user", e),
    };

    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        tracing::debug!(username, "Rejected login");
        return error_response(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    };

    match create_session(&mut conn, user.id) {
        Ok(token) => {
            tracing::info!(user_id = %user.id, "User logged in");
            (StatusCode::OK, Json(LoginResponse { token })).into_response()
        }
        Err(e) => internal_error("Failed to create session", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_shape() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username": " Alice ", "password": "pw"}"#).unwrap();
        assert_eq!(req.username.trim(), "Alice");
        assert_eq!(req.password, "pw");
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let response = error_response(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
