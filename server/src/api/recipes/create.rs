use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, NewRecipeIngredient};
use crate::schema::{recipe_ingredients, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cookbook_core::MAX_RECIPE_NAME_LEN;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeIngredientInput {
    pub ingredient_id: i32,
    /// Amount in the ingredient's base unit (ml, g or a count)
    pub amount: f64,
}

/// A complete recipe draft, including its ingredient list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: String,
    /// Preparation time in minutes
    pub prep_minutes: i32,
    /// One entry per step, in order
    pub steps: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: i32,
}

fn validate(request: &CreateRecipeRequest) -> Result<(), String> {
    if request.name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if request.name.trim().chars().count() > MAX_RECIPE_NAME_LEN {
        return Err(format!(
            "Name must be at most {} characters",
            MAX_RECIPE_NAME_LEN
        ));
    }
    if request.description.trim().is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    if request.prep_minutes <= 0 {
        return Err("Preparation time must be a positive number of minutes".to_string());
    }
    if request.steps.iter().all(|s| s.trim().is_empty()) {
        return Err("Steps cannot be empty".to_string());
    }

    let mut seen = HashSet::new();
    for ingredient in &request.ingredients {
        if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
            return Err(format!(
                "Invalid amount {} for ingredient {}",
                ingredient.amount, ingredient.ingredient_id
            ));
        }
        if !seen.insert(ingredient.ingredient_id) {
            return Err(format!(
                "Ingredient {} is listed more than once",
                ingredient.ingredient_id
            ));
        }
    }
    Ok(())
}

/// Steps are stored newline-delimited; blank entries are dropped.
fn join_steps(steps: &[String]) -> String {
    steps
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request or unknown ingredient", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate(&request) {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let mut conn = get_conn!(pool);

    let steps = join_steps(&request.steps);

    // Recipe and ingredient rows go in together or not at all
    let result: Result<i32, DieselError> = conn.transaction(|conn| {
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                name: request.name.trim(),
                prep_minutes: request.prep_minutes,
                steps: &steps,
                rating: 0.0,
                description: request.description.trim(),
                source_url: None,
                created_by: Some(user.id),
            })
            .returning(recipes::id)
            .get_result(conn)?;

        let rows: Vec<NewRecipeIngredient> = request
            .ingredients
            .iter()
            .zip(0..)
            .map(|(ingredient, position)| NewRecipeIngredient {
                recipe_id,
                ingredient_id: ingredient.ingredient_id,
                amount: ingredient.amount,
                position,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(recipe_ingredients::table)
                .values(&rows)
                .execute(conn)?;
        }

        Ok(recipe_id)
    });

    match result {
        Ok(recipe_id) => {
            tracing::info!(recipe_id, user_id = %user.id, "Recipe created");
            (
                StatusCode::CREATED,
                Json(CreateRecipeResponse { id: recipe_id }),
            )
                .into_response()
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
            error_response(StatusCode::BAD_REQUEST, "Unknown ingredient")
        }
        Err(e) => internal_error("Failed to create recipe", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: "salt water".to_string(),
            description: "very salty".to_string(),
            prep_minutes: 1,
            steps: vec!["1. add water".to_string(), "2. add salt".to_string()],
            ingredients: vec![
                RecipeIngredientInput {
                    ingredient_id: 6,
                    amount: 250.0,
                },
                RecipeIngredientInput {
                    ingredient_id: 7,
                    amount: 5.0,
                },
            ],
        }
    }

    #[test]
    fn test_validate_accepts_complete_recipe() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn test_validate_accepts_no_ingredients() {
        let mut req = request();
        req.ingredients.clear();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut req = request();
        req.name = "  ".to_string();
        assert!(validate(&req).is_err());

        let mut req = request();
        req.prep_minutes = 0;
        assert!(validate(&req).is_err());

        let mut req = request();
        req.steps = vec!["".to_string()];
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let mut req = request();
        req.name = "a".repeat(MAX_RECIPE_NAME_LEN);
        assert!(validate(&req).is_ok());

        req.name.push('a');
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_amounts() {
        let mut req = request();
        req.ingredients[0].amount = -1.0;
        assert!(validate(&req).is_err());

        let mut req = request();
        req.ingredients[0].amount = f64::NAN;
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ingredient() {
        let mut req = request();
        req.ingredients[1].ingredient_id = 6;
        let err = validate(&req).unwrap_err();
        assert!(err.contains("more than once"), "{}", err);
    }

    #[test]
    fn test_join_steps() {
        let steps = vec![" mix ".to_string(), "".to_string(), "bake".to_string()];
        assert_eq!(join_steps(&steps), "mix\nbake");
    }
}
