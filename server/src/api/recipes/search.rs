use crate::api::{error_response, internal_error, ErrorResponse};
use crate::db::DbPool;
use crate::get_conn;
use crate::recipe_source::PgRecipeSource;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cookbook_core::{
    filter_recipes_by_ingredient_amounts, filter_recipes_by_ingredients, IngredientId, RecipeId,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use utoipa::ToSchema;

use super::list::{ListRecipesResponse, RecipeSummary, SUMMARY_COLUMNS};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AmountLimit {
    pub ingredient_id: i32,
    /// Largest amount available, in the ingredient's base unit
    pub max_amount: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Only recipes whose name contains this text (case-sensitive)
    #[serde(default)]
    pub name: String,
    /// Ingredients the recipe may use
    #[serde(default)]
    pub ingredient_ids: Vec<i32>,
    /// When present, every ingredient a recipe uses must have a limit here
    /// and the recipe's amount must not exceed it
    pub limits: Option<Vec<AmountLimit>>,
}

/// The allowed set and the optional per-ingredient limits of a search.
///
/// Ingredients with a limit are always allowed.
fn search_terms(
    request: &SearchRequest,
) -> Result<(BTreeSet<IngredientId>, Option<HashMap<IngredientId, f64>>), String> {
    let mut allowed: BTreeSet<IngredientId> = request.ingredient_ids.iter().copied().collect();

    let limits = match &request.limits {
        None => None,
        Some(limits) => {
            let mut max_amounts = HashMap::with_capacity(limits.len());
            for limit in limits {
                if !limit.max_amount.is_finite() || limit.max_amount < 0.0 {
                    return Err(format!(
                        "Invalid max_amount {} for ingredient {}",
                        limit.max_amount, limit.ingredient_id
                    ));
                }
                allowed.insert(limit.ingredient_id);
                max_amounts.insert(limit.ingredient_id, limit.max_amount);
            }
            Some(max_amounts)
        }
    };

    Ok((allowed, limits))
}

#[utoipa::path(
    post,
    path = "/api/recipes/search",
    tag = "recipes",
    request_body(content = SearchRequest, example = json!({
        "name": "salad",
        "ingredient_ids": [1, 2, 3],
        "limits": [{"ingredient_id": 1, "max_amount": 250.0}]
    })),
    responses(
        (status = 200, description = "Recipes that can be made from the given ingredients, by id", body = ListRecipesResponse),
        (status = 400, description = "Invalid limit", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let (allowed, limits) = match search_terms(&request) {
        Ok(terms) => terms,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let mut conn = get_conn!(pool);

    let matched: Result<Vec<RecipeId>, diesel::result::Error> = {
        let mut source = PgRecipeSource::new(&mut conn);
        match &limits {
            Some(max_amounts) => {
                filter_recipes_by_ingredient_amounts(&request.name, &allowed, max_amounts, &mut source)
            }
            None => filter_recipes_by_ingredients(&request.name, &allowed, &mut source)
                .map(|ids| ids.into_iter().collect()),
        }
    };

    let ids = match matched {
        Ok(ids) => ids,
        Err(e) => return internal_error("Failed to match recipes", e),
    };

    tracing::debug!(
        name = %request.name,
        allowed = allowed.len(),
        limited = limits.is_some(),
        matched = ids.len(),
        "Recipe search"
    );

    if ids.is_empty() {
        return (StatusCode::OK, Json(ListRecipesResponse { recipes: vec![] })).into_response();
    }

    match recipes::table
        .filter(recipes::id.eq_any(ids))
        .select(SUMMARY_COLUMNS)
        .order(recipes::id.asc())
        .load::<RecipeSummary>(&mut conn)
    {
        Ok(rows) => (StatusCode::OK, Json(ListRecipesResponse { recipes: rows })).into_response(),
        Err(e) => internal_error("Failed to fetch recipes", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ids: &[i32], limits: Option<Vec<(i32, f64)>>) -> SearchRequest {
        SearchRequest {
            name: String::new(),
            ingredient_ids: ids.to_vec(),
            limits: limits.map(|l| {
                l.into_iter()
                    .map(|(ingredient_id, max_amount)| AmountLimit {
                        ingredient_id,
                        max_amount,
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_search_terms_without_limits() {
        let (allowed, limits) = search_terms(&request(&[3, 1, 3], None)).unwrap();
        assert_eq!(allowed, BTreeSet::from([1, 3]));
        assert!(limits.is_none());
    }

    #[test]
    fn test_limited_ingredients_are_allowed() {
        let (allowed, limits) =
            search_terms(&request(&[1], Some(vec![(2, 10.0), (1, 5.0)]))).unwrap();
        assert_eq!(allowed, BTreeSet::from([1, 2]));
        assert_eq!(limits.unwrap(), HashMap::from([(1, 5.0), (2, 10.0)]));
    }

    #[test]
    fn test_search_terms_rejects_bad_limit() {
        assert!(search_terms(&request(&[], Some(vec![(1, -1.0)]))).is_err());
        assert!(search_terms(&request(&[], Some(vec![(1, f64::INFINITY)]))).is_err());
    }

    #[test]
    fn test_search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"ingredient_ids": [1]}"#).unwrap();
        assert_eq!(req.name, "");
        assert!(req.limits.is_none());
    }
}
