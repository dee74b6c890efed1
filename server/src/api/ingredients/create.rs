use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cookbook_core::{MeasureKind, MAX_INGREDIENT_NAME_LEN};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::list::IngredientItem;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    /// volume, mass or count ("units" is accepted for count)
    pub measure: String,
}

/// Normalized (name, measure) for a new ingredient.
fn validate(request: &CreateIngredientRequest) -> Result<(String, MeasureKind), String> {
    let name = request.name.trim().to_lowercase();
    if name.is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_INGREDIENT_NAME_LEN {
        return Err("Ingredient name is too long".to_string());
    }
    let measure = MeasureKind::from_str(&request.measure)
        .ok_or_else(|| format!("Unknown measure '{}'", request.measure))?;
    Ok((name, measure))
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body(content = CreateIngredientRequest, example = json!({"name": "water", "measure": "volume"})),
    responses(
        (status = 201, description = "Ingredient created", body = IngredientItem),
        (status = 400, description = "Invalid name or measure", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Ingredient already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredient(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateIngredientRequest>,
) -> impl IntoResponse {
    let (name, measure) = match validate(&request) {
        Ok(v) => v,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let mut conn = get_conn!(pool);

    match diesel::insert_into(ingredients::table)
        .values(NewIngredient {
            name: &name,
            measure: measure.as_str(),
        })
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
    {
        Ok(ingredient) => {
            tracing::info!(ingredient_id = ingredient.id, name = %ingredient.name, "Ingredient created");
            (StatusCode::CREATED, Json(IngredientItem::from(ingredient))).into_response()
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            error_response(StatusCode::CONFLICT, "Ingredient already exists")
        }
        Err(e) => internal_error("Failed to create ingredient", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, measure: &str) -> CreateIngredientRequest {
        CreateIngredientRequest {
            name: name.to_string(),
            measure: measure.to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes_name() {
        assert_eq!(
            validate(&request("  Ranch Dressing ", "volume")),
            Ok(("ranch dressing".to_string(), MeasureKind::Volume))
        );
    }

    #[test]
    fn test_validate_accepts_units_alias() {
        assert_eq!(
            validate(&request("carrots", "units")),
            Ok(("carrots".to_string(), MeasureKind::Count))
        );
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(validate(&request("", "mass")).is_err());
        assert!(validate(&request("salt", "pinch")).is_err());
        assert!(validate(&request(&"s".repeat(MAX_INGREDIENT_NAME_LEN + 1), "mass")).is_err());
    }
}
