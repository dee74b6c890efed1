use serde::{Deserialize, Serialize};

pub type RecipeId = i32;
pub type IngredientId = i32;

/// Longest recipe name the store accepts, in characters.
pub const MAX_RECIPE_NAME_LEN: usize = 256;
/// Longest ingredient name the store accepts, in characters.
pub const MAX_INGREDIENT_NAME_LEN: usize = 128;

/// How an ingredient is measured. Amounts are always stored in the
/// kind's base unit: milliliters, grams, or a plain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Volume,
    Mass,
    Count,
}

impl MeasureKind {
    pub const ALL: &'static [MeasureKind] =
        &[MeasureKind::Volume, MeasureKind::Mass, MeasureKind::Count];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureKind::Volume => "volume",
            MeasureKind::Mass => "mass",
            MeasureKind::Count => "count",
        }
    }

    /// Parse a measure name. Requests may say "units" for count; only the
    /// canonical names from [`MeasureKind::as_str`] are ever stored.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volume" => Some(MeasureKind::Volume),
            "mass" => Some(MeasureKind::Mass),
            "count" | "units" => Some(MeasureKind::Count),
            _ => None,
        }
    }

    pub fn base_unit(&self) -> &'static str {
        match self {
            MeasureKind::Volume => "ml",
            MeasureKind::Mass => "g",
            MeasureKind::Count => "",
        }
    }
}

/// One (ingredient, amount) pair of a recipe, amount in the ingredient's base unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: IngredientId,
    pub amount: f64,
}

impl RecipeIngredient {
    pub fn new(ingredient_id: IngredientId, amount: f64) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Split newline-delimited recipe steps into a list, dropping blank lines.
pub fn split_steps(steps: &str) -> Vec<String> {
    steps
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
