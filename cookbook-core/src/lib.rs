pub mod conversions;
pub mod display;
pub mod error;
pub mod matcher;
pub mod rating;
pub mod spoonacular;
pub mod types;

pub use conversions::{
    compose_mass, compose_volume, decompose_mass, decompose_volume, MassBreakdown,
    VolumeBreakdown,
};
pub use display::{format_mass, format_volume, MeasurePreference};
pub use error::{ConversionError, RatingError, SpoonacularError};
pub use matcher::{
    filter_recipes_by_ingredient_amounts, filter_recipes_by_ingredients, InMemoryRecipeSource,
    RecipeSource,
};
pub use rating::{average_rating, validate_rating};
pub use spoonacular::{
    parse_recipe, FakeSpoonacular, ImportedIngredient, ImportedRecipe, SpoonacularApi,
    SpoonacularClient, SpoonacularRecipe,
};
pub use types::{
    split_steps, IngredientId, MeasureKind, RecipeId, RecipeIngredient, MAX_INGREDIENT_NAME_LEN,
    MAX_RECIPE_NAME_LEN,
};
