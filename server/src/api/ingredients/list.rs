use crate::api::internal_error;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientItem {
    pub id: i32,
    pub name: String,
    /// volume, mass or count
    pub measure: String,
    /// Unit amounts of this ingredient are stored in ("ml", "g" or empty)
    pub base_unit: String,
}

impl From<Ingredient> for IngredientItem {
    fn from(ingredient: Ingredient) -> Self {
        let base_unit = ingredient.measure_kind().base_unit().to_string();
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measure: ingredient.measure,
            base_unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientsResponse {
    pub ingredients: Vec<IngredientItem>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    responses(
        (status = 200, description = "All ingredients ordered by name", body = IngredientsResponse)
    )
)]
pub async fn list_ingredients(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match ingredients::table
        .order(ingredients::name.asc())
        .select(Ingredient::as_select())
        .load(&mut conn)
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(IngredientsResponse {
                ingredients: rows.into_iter().map(IngredientItem::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to fetch ingredients", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_base_unit() {
        let item = IngredientItem::from(Ingredient {
            id: 6,
            name: "water".to_string(),
            measure: "volume".to_string(),
        });
        assert_eq!(item.base_unit, "ml");

        let item = IngredientItem::from(Ingredient {
            id: 1,
            name: "carrots".to_string(),
            measure: "units".to_string(),
        });
        assert_eq!(item.base_unit, "");
    }
}
