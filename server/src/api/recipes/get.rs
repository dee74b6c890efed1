use crate::api::{internal_error, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Ingredient, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipes, user_recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cookbook_core::display::format_decimal;
use cookbook_core::{average_rating, split_steps, MeasurePreference};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientView {
    pub ingredient_id: i32,
    pub name: String,
    /// volume, mass or count
    pub measure: String,
    /// Stored amount in the base unit
    pub amount: f64,
    /// Amount rendered for the viewer, e.g. "1 cup, 1 tablespoon"
    pub display: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub prep_minutes: i32,
    pub steps: Vec<String>,
    /// Rating stored on the recipe (0 when unrated)
    pub rating: f64,
    /// Mean of user review ratings (0 when there are none)
    pub review_rating: f64,
    pub review_count: usize,
    pub source_url: Option<String>,
    pub ingredients: Vec<RecipeIngredientView>,
    /// Whether the caller may save this recipe
    pub can_save: bool,
    /// Whether the caller has saved this recipe
    pub saved: bool,
}

fn ingredient_view(
    preference: &MeasurePreference,
    ingredient: Ingredient,
    amount: f64,
) -> RecipeIngredientView {
    let display = preference
        .format_amount(ingredient.measure_kind(), amount)
        .unwrap_or_else(|e| {
            tracing::warn!(ingredient_id = ingredient.id, "Unformattable amount: {}", e);
            format_decimal(amount)
        });

    RecipeIngredientView {
        ingredient_id: ingredient.id,
        name: ingredient.name,
        measure: ingredient.measure,
        amount,
        display,
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details with amounts in the caller's preferred units", body = RecipeResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => return internal_error("Failed to fetch recipe", e),
    };

    let rows: Vec<(Ingredient, f64)> = match recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(id))
        .order((
            recipe_ingredients::position.asc(),
            recipe_ingredients::ingredient_id.asc(),
        ))
        .select((Ingredient::as_select(), recipe_ingredients::amount))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => return internal_error("Failed to fetch recipe ingredients", e),
    };

    let ratings: Vec<f64> = match user_recipes::table
        .filter(user_recipes::recipe_id.eq(id))
        .filter(user_recipes::rating.is_not_null())
        .select(user_recipes::rating.assume_not_null())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch reviews", e),
    };

    let saved = match &user {
        Some(user) => match user_recipes::table
            .find((user.id, id))
            .select(user_recipes::saved)
            .first::<bool>(&mut conn)
            .optional()
        {
            Ok(saved) => saved.unwrap_or(false),
            Err(e) => return internal_error("Failed to fetch saved state", e),
        },
        None => false,
    };

    let preference = user
        .as_ref()
        .map(|u| u.measure_preference())
        .unwrap_or_default();

    let response = RecipeResponse {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        prep_minutes: recipe.prep_minutes,
        steps: split_steps(&recipe.steps),
        rating: recipe.rating,
        review_rating: average_rating(ratings.iter().copied()),
        review_count: ratings.len(),
        source_url: recipe.source_url,
        ingredients: rows
            .into_iter()
            .map(|(ingredient, amount)| ingredient_view(&preference, ingredient, amount))
            .collect(),
        can_save: user.is_some(),
        saved,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(measure: &str) -> Ingredient {
        Ingredient {
            id: 1,
            name: "water".to_string(),
            measure: measure.to_string(),
        }
    }

    #[test]
    fn test_ingredient_view_metric() {
        let view = ingredient_view(&MeasurePreference::default(), ingredient("volume"), 333.0);
        assert_eq!(view.display, "333.00 ml");
        assert_eq!(view.amount, 333.0);
    }

    #[test]
    fn test_ingredient_view_imperial() {
        let preference = MeasurePreference::new(false, false);
        let view = ingredient_view(&preference, ingredient("volume"), 333.0);
        assert_eq!(view.display, "1 cup, 1 quarter cup, 1 tablespoon, 1 teaspoon");

        let view = ingredient_view(&preference, ingredient("mass"), 600.0);
        assert_eq!(view.display, "1 lb and 5.16 ozs");
    }

    #[test]
    fn test_ingredient_view_count() {
        let view = ingredient_view(&MeasurePreference::default(), ingredient("count"), 3.0);
        assert_eq!(view.display, "3");
        assert_eq!(view.measure, "count");
    }

    #[test]
    fn test_ingredient_view_huge_imperial_amount_falls_back() {
        let preference = MeasurePreference::new(false, false);
        let view = ingredient_view(&preference, ingredient("mass"), 1e15);
        assert_eq!(view.display, "1000000000000000");
    }
}
