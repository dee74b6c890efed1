use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewIngredient, NewRecipe, NewRecipeIngredient};
use crate::schema::{ingredients, recipe_ingredients, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cookbook_core::spoonacular::{parse_recipe, SpoonacularApi, SpoonacularClient};
use cookbook_core::{ImportedRecipe, MeasureKind, SpoonacularError, SpoonacularRecipe};
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_NUMBER: u32 = 10;
const MAX_NUMBER: u32 = 100;

fn default_number() -> u32 {
    DEFAULT_NUMBER
}

/// Give exactly one of `tag` (random recipes with that tag) or `query`
/// (recipes whose titles match).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SpoonacularImportRequest {
    pub tag: Option<String>,
    pub query: Option<String>,
    /// How many recipes to request (1 to 100, default 10)
    #[serde(default = "default_number")]
    pub number: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedRecipeSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SpoonacularImportResponse {
    pub imported: Vec<ImportedRecipeSummary>,
    /// Names of recipes that were already imported from the same source URL
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportSource<'a> {
    Tag(&'a str),
    Query(&'a str),
}

fn import_source(request: &SpoonacularImportRequest) -> Result<ImportSource<'_>, &'static str> {
    if request.number == 0 || request.number > MAX_NUMBER {
        return Err("number must be between 1 and 100");
    }
    let tag = request.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let query = request.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
    match (tag, query) {
        (Some(tag), None) => Ok(ImportSource::Tag(tag)),
        (None, Some(query)) => Ok(ImportSource::Query(query)),
        (Some(_), Some(_)) => Err("Give either tag or query, not both"),
        (None, None) => Err("Either tag or query is required"),
    }
}

async fn fetch_recipes(
    api: &dyn SpoonacularApi,
    source: ImportSource<'_>,
    number: u32,
) -> Result<Vec<SpoonacularRecipe>, SpoonacularError> {
    match source {
        ImportSource::Tag(tag) => api.random_recipes(tag, number).await,
        ImportSource::Query(query) => api.recipes_by_keyword(query, number).await,
    }
}

/// Store imported recipes, creating any ingredients that do not exist yet.
///
/// Recipes whose source URL is already stored are skipped. An ingredient that
/// already exists with a different measure is left off the recipe, since its
/// amount would be in the wrong unit.
fn store_recipes(
    conn: &mut PgConnection,
    user_id: Uuid,
    imported: &[ImportedRecipe],
) -> QueryResult<SpoonacularImportResponse> {
    let mut response = SpoonacularImportResponse::default();

    for recipe in imported {
        if let Some(url) = recipe.source_url.as_deref() {
            let duplicate: bool =
                select(exists(recipes::table.filter(recipes::source_url.eq(url)))).get_result(conn)?;
            if duplicate {
                response.skipped.push(recipe.name.clone());
                continue;
            }
        }

        let new_ingredients: Vec<NewIngredient> = recipe
            .ingredients
            .iter()
            .map(|i| NewIngredient {
                name: &i.name,
                measure: i.measure.as_str(),
            })
            .collect();
        if !new_ingredients.is_empty() {
            diesel::insert_into(ingredients::table)
                .values(&new_ingredients)
                .on_conflict(ingredients::name)
                .do_nothing()
                .execute(conn)?;
        }

        let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        let stored: HashMap<String, (i32, String)> = ingredients::table
            .filter(ingredients::name.eq_any(names))
            .select((ingredients::name, ingredients::id, ingredients::measure))
            .load::<(String, i32, String)>(conn)?
            .into_iter()
            .map(|(name, id, measure)| (name, (id, measure)))
            .collect();

        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                name: &recipe.name,
                prep_minutes: recipe.prep_minutes,
                steps: &recipe.steps,
                rating: recipe.rating,
                description: &recipe.description,
                source_url: recipe.source_url.as_deref(),
                created_by: Some(user_id),
            })
            .returning(recipes::id)
            .get_result(conn)?;

        let mut rows = Vec::with_capacity(recipe.ingredients.len());
        for ingredient in &recipe.ingredients {
            let Some((ingredient_id, measure)) = stored.get(&ingredient.name) else {
                continue;
            };
            if MeasureKind::from_str(measure) != Some(ingredient.measure) {
                tracing::warn!(
                    recipe = %recipe.name,
                    ingredient = %ingredient.name,
                    stored = %measure,
                    imported = ingredient.measure.as_str(),
                    "Skipping ingredient with mismatched measure"
                );
                continue;
            }
            rows.push(NewRecipeIngredient {
                recipe_id,
                ingredient_id: *ingredient_id,
                amount: ingredient.amount,
                position: i32::try_from(rows.len()).unwrap_or(i32::MAX),
            });
        }
        if !rows.is_empty() {
            diesel::insert_into(recipe_ingredients::table)
                .values(&rows)
                .execute(conn)?;
        }

        response.imported.push(ImportedRecipeSummary {
            id: recipe_id,
            name: recipe.name.clone(),
        });
    }

    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/import/spoonacular",
    tag = "import",
    request_body(content = SpoonacularImportRequest, example = json!({"tag": "vegetarian", "number": 5})),
    responses(
        (status = 201, description = "Recipes imported", body = SpoonacularImportResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Spoonacular request failed", body = ErrorResponse),
        (status = 503, description = "Spoonacular is not configured", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_spoonacular(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<SpoonacularImportRequest>,
) -> impl IntoResponse {
    let source = match import_source(&request) {
        Ok(s) => s,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let client = match SpoonacularClient::from_env() {
        Ok(c) => c,
        Err(e @ SpoonacularError::NotConfigured(_)) => {
            return error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => return internal_error("Failed to create Spoonacular client", e),
    };

    let fetched = match fetch_recipes(&client, source, request.number).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Spoonacular request failed: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    let parsed: Vec<ImportedRecipe> = fetched.iter().filter_map(parse_recipe).collect();

    let mut conn = get_conn!(pool);

    match conn.transaction(|conn| store_recipes(conn, user.id, &parsed)) {
        Ok(response) => {
            tracing::info!(
                fetched = fetched.len(),
                imported = response.imported.len(),
                skipped = response.skipped.len(),
                "Imported Spoonacular recipes"
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => internal_error("Failed to store imported recipes", e),
    }
}
