//! Spoonacular recipe import.
//!
//! Response types for the subset of the Spoonacular API we read, and the
//! conversion of a Spoonacular recipe into an [`ImportedRecipe`] whose
//! ingredient amounts are already in base units (ml, g, count).

mod client;
mod fake;

pub use client::SpoonacularClient;
pub use fake::FakeSpoonacular;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::conversions::{GRAMS_PER_OUNCE, ML_PER_CUP, ML_PER_TABLESPOON, ML_PER_TEASPOON, OUNCES_PER_POUND};
use crate::error::SpoonacularError;
use crate::rating::rating_from_score;
use crate::types::{split_steps, MeasureKind, MAX_INGREDIENT_NAME_LEN, MAX_RECIPE_NAME_LEN};

/// Source of Spoonacular recipes.
#[async_trait]
pub trait SpoonacularApi: Send + Sync + fmt::Debug {
    /// Random recipes carrying `tag` (e.g. "vegetarian").
    async fn random_recipes(
        &self,
        tag: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError>;

    /// Recipes whose titles autocomplete from `query`, with full information.
    async fn recipes_by_keyword(
        &self,
        query: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoonacularRecipe {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<i32>,
    #[serde(default)]
    pub preparation_minutes: Option<i32>,
    #[serde(default)]
    pub cooking_minutes: Option<i32>,
    #[serde(default)]
    pub spoonacular_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub analyzed_instructions: Vec<AnalyzedInstruction>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzedInstruction {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionStep {
    pub step: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub measures: Option<Measures>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Measures {
    #[serde(default)]
    pub metric: Option<Measure>,
    #[serde(default)]
    pub us: Option<Measure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub amount: f64,
    #[serde(default)]
    pub unit_short: String,
}

/// Body of `GET /recipes/random`.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomRecipesResponse {
    pub recipes: Vec<SpoonacularRecipe>,
}

/// One entry of `GET /recipes/autocomplete`.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteHit {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

/// A recipe ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRecipe {
    pub name: String,
    pub prep_minutes: i32,
    pub steps: String,
    pub rating: f64,
    pub description: String,
    pub source_url: Option<String>,
    pub ingredients: Vec<ImportedIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedIngredient {
    pub name: String,
    pub measure: MeasureKind,
    pub amount: f64,
}

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(li|p|ol|ul|div)>").expect("valid block break regex")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid html tag regex"));

/// Remove HTML markup, turning block-level breaks into newlines.
pub fn strip_html(html: &str) -> String {
    let with_breaks = BLOCK_BREAK.replace_all(html, "\n");
    let text = HTML_TAG.replace_all(&with_breaks, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    split_steps(&text).join("\n")
}

/// Factor converting one `unit` into the base unit of its measure kind.
fn unit_to_base(unit: &str) -> Option<(MeasureKind, f64)> {
    let unit = unit.trim().to_ascii_lowercase();
    let converted = match unit.as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => (MeasureKind::Volume, 1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => (MeasureKind::Volume, 1000.0),
        "tsp" | "tsps" | "teaspoon" | "teaspoons" => (MeasureKind::Volume, ML_PER_TEASPOON),
        "tbsp" | "tbsps" | "tablespoon" | "tablespoons" => (MeasureKind::Volume, ML_PER_TABLESPOON),
        "cup" | "cups" => (MeasureKind::Volume, ML_PER_CUP),
        "g" | "gram" | "grams" => (MeasureKind::Mass, 1.0),
        "kg" | "kilogram" | "kilograms" => (MeasureKind::Mass, 1000.0),
        "mg" | "milligram" | "milligrams" => (MeasureKind::Mass, 0.001),
        "oz" | "ounce" | "ounces" => (MeasureKind::Mass, GRAMS_PER_OUNCE),
        "lb" | "lbs" | "pound" | "pounds" => (MeasureKind::Mass, GRAMS_PER_OUNCE * OUNCES_PER_POUND),
        _ => return None,
    };
    Some(converted)
}

fn import_ingredient(ingredient: &ExtendedIngredient) -> Option<ImportedIngredient> {
    let name = ingredient.name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    if name.chars().count() > MAX_INGREDIENT_NAME_LEN {
        tracing::warn!(ingredient = %name, "Dropping ingredient with overlong name");
        return None;
    }

    let measure = ingredient.measures.as_ref().and_then(|m| m.metric.as_ref().or(m.us.as_ref()));
    let (amount, unit) = match measure {
        Some(m) => (m.amount, m.unit_short.as_str()),
        None => (
            ingredient.amount.unwrap_or(1.0),
            ingredient.unit.as_deref().unwrap_or(""),
        ),
    };
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    let (measure, amount) = match unit_to_base(unit) {
        Some((kind, factor)) => (kind, amount * factor),
        None => (MeasureKind::Count, amount),
    };

    Some(ImportedIngredient {
        name,
        measure,
        amount,
    })
}

/// Convert a Spoonacular recipe into an importable recipe.
///
/// Returns `None` for recipes without a title. Titles longer than
/// [`MAX_RECIPE_NAME_LEN`] are cut to that length.
pub fn parse_recipe(recipe: &SpoonacularRecipe) -> Option<ImportedRecipe> {
    let title = recipe.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let name: String = title.chars().take(MAX_RECIPE_NAME_LEN).collect();
    if name.len() < title.len() {
        tracing::warn!(recipe_id = recipe.id, "Truncating overlong recipe title");
    }

    let prep_minutes = recipe.ready_in_minutes.unwrap_or_else(|| {
        recipe
            .preparation_minutes
            .unwrap_or(0)
            .max(0)
            .saturating_add(recipe.cooking_minutes.unwrap_or(0).max(0))
    });

    let analyzed: Vec<&str> = recipe
        .analyzed_instructions
        .iter()
        .flat_map(|i| i.steps.iter())
        .map(|s| s.step.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let steps = if analyzed.is_empty() {
        recipe.instructions.as_deref().map(strip_html).unwrap_or_default()
    } else {
        analyzed.join("\n")
    };

    // Merge duplicates, keeping first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut merged: BTreeMap<String, ImportedIngredient> = BTreeMap::new();
    for ingredient in recipe.extended_ingredients.iter().filter_map(import_ingredient) {
        match merged.get_mut(&ingredient.name) {
            Some(existing) if existing.measure == ingredient.measure => {
                existing.amount += ingredient.amount;
            }
            Some(existing) => {
                tracing::warn!(
                    recipe_id = recipe.id,
                    ingredient = %ingredient.name,
                    first = existing.measure.as_str(),
                    second = ingredient.measure.as_str(),
                    "Dropping ingredient listed with conflicting measures"
                );
            }
            None => {
                order.push(ingredient.name.clone());
                merged.insert(ingredient.name.clone(), ingredient);
            }
        }
    }
    let ingredients = order
        .into_iter()
        .filter_map(|name| merged.remove(&name))
        .collect();

    Some(ImportedRecipe {
        name: name.trim_end().to_string(),
        prep_minutes: prep_minutes.max(0),
        steps,
        rating: recipe.spoonacular_score.map(rating_from_score).unwrap_or(0.0),
        description: recipe.summary.as_deref().map(strip_html).unwrap_or_default(),
        source_url: recipe.source_url.clone(),
        ingredients,
    })
}
