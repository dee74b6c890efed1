//! Recipe/ingredient matching.
//!
//! Answers "which recipes can I make with these ingredients (and these
//! amounts)?". A recipe qualifies when its name contains the requested
//! substring and every ingredient it uses is in the allowed set.
//!
//! Name matching is a case-sensitive substring test. In memory that is
//! `str::contains`; the database-backed source uses `LIKE` with the
//! wildcards in the substring escaped.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::convert::Infallible;

use crate::types::{IngredientId, RecipeId, RecipeIngredient};

/// Read-only access to stored recipes and their ingredient amounts.
pub trait RecipeSource {
    type Error;

    /// Ids of every recipe whose name contains `name_substring`.
    fn recipe_ids_by_name(&mut self, name_substring: &str)
        -> Result<BTreeSet<RecipeId>, Self::Error>;

    /// Ids of name-matching recipes that use at least one ingredient not in `allowed`.
    fn recipe_ids_with_disallowed_ingredients(
        &mut self,
        name_substring: &str,
        allowed: &BTreeSet<IngredientId>,
    ) -> Result<BTreeSet<RecipeId>, Self::Error>;

    /// The recipe's (ingredient, amount) pairs in recipe order.
    fn recipe_ingredients(
        &mut self,
        recipe_id: RecipeId,
    ) -> Result<Vec<RecipeIngredient>, Self::Error>;
}

/// Recipes whose name contains `name_substring` and whose ingredients are all in `allowed`.
///
/// Computed as a set difference: all name-matching recipes minus those that
/// reference a disallowed ingredient. A recipe with no ingredients qualifies
/// whenever its name matches.
pub fn filter_recipes_by_ingredients<S: RecipeSource>(
    name_substring: &str,
    allowed: &BTreeSet<IngredientId>,
    source: &mut S,
) -> Result<BTreeSet<RecipeId>, S::Error> {
    let candidates = source.recipe_ids_by_name(name_substring)?;
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let excluded = source.recipe_ids_with_disallowed_ingredients(name_substring, allowed)?;
    let matching: BTreeSet<RecipeId> = candidates.difference(&excluded).copied().collect();

    tracing::debug!(
        name = name_substring,
        candidates = candidates.len(),
        excluded = excluded.len(),
        matching = matching.len(),
        "filtered recipes by ingredients"
    );

    Ok(matching)
}

/// Like [`filter_recipes_by_ingredients`], additionally requiring every
/// amount in the recipe to be at most the matching entry in `max_amounts`.
///
/// An ingredient missing from `max_amounts` disqualifies the recipe.
/// Results are in ascending recipe id order.
pub fn filter_recipes_by_ingredient_amounts<S: RecipeSource>(
    name_substring: &str,
    allowed: &BTreeSet<IngredientId>,
    max_amounts: &HashMap<IngredientId, f64>,
    source: &mut S,
) -> Result<Vec<RecipeId>, S::Error> {
    let candidates = filter_recipes_by_ingredients(name_substring, allowed, source)?;

    let mut matching = Vec::with_capacity(candidates.len());
    for recipe_id in candidates {
        let ingredients = source.recipe_ingredients(recipe_id)?;
        if within_limits(&ingredients, max_amounts) {
            matching.push(recipe_id);
        } else {
            tracing::trace!(recipe_id, "recipe exceeds ingredient amount limits");
        }
    }

    Ok(matching)
}

fn within_limits(ingredients: &[RecipeIngredient], max_amounts: &HashMap<IngredientId, f64>) -> bool {
    ingredients.iter().all(|ingredient| {
        max_amounts
            .get(&ingredient.ingredient_id)
            .is_some_and(|max| ingredient.amount <= *max)
    })
}

#[derive(Debug, Clone)]
struct StoredRecipe {
    name: String,
    ingredients: Vec<RecipeIngredient>,
}

/// A [`RecipeSource`] backed by an in-memory map, for tests and offline tools.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipeSource {
    recipes: BTreeMap<RecipeId, StoredRecipe>,
}

impl InMemoryRecipeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a recipe.
    pub fn add_recipe(
        &mut self,
        id: RecipeId,
        name: impl Into<String>,
        ingredients: Vec<RecipeIngredient>,
    ) {
        self.recipes.insert(
            id,
            StoredRecipe {
                name: name.into(),
                ingredients,
            },
        );
    }

    pub fn with_recipe(
        mut self,
        id: RecipeId,
        name: impl Into<String>,
        ingredients: Vec<RecipeIngredient>,
    ) -> Self {
        self.add_recipe(id, name, ingredients);
        self
    }

    fn matching_names<'a>(
        &'a self,
        name_substring: &'a str,
    ) -> impl Iterator<Item = (&'a RecipeId, &'a StoredRecipe)> + 'a {
        self.recipes
            .iter()
            .filter(move |(_, recipe)| recipe.name.contains(name_substring))
    }
}

impl RecipeSource for InMemoryRecipeSource {
    type Error = Infallible;

    fn recipe_ids_by_name(&mut self, name_substring: &str) -> Result<BTreeSet<RecipeId>, Infallible> {
        Ok(self.matching_names(name_substring).map(|(id, _)| *id).collect())
    }

    fn recipe_ids_with_disallowed_ingredients(
        &mut self,
        name_substring: &str,
        allowed: &BTreeSet<IngredientId>,
    ) -> Result<BTreeSet<RecipeId>, Infallible> {
        Ok(self
            .matching_names(name_substring)
            .filter(|(_, recipe)| {
                recipe
                    .ingredients
                    .iter()
                    .any(|i| !allowed.contains(&i.ingredient_id))
            })
            .map(|(id, _)| *id)
            .collect())
    }

    fn recipe_ingredients(&mut self, recipe_id: RecipeId) -> Result<Vec<RecipeIngredient>, Infallible> {
        Ok(self
            .recipes
            .get(&recipe_id)
            .map(|r| r.ingredients.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredients(ids: &[IngredientId]) -> Vec<RecipeIngredient> {
        ids.iter().map(|id| RecipeIngredient::new(*id, 5.0)).collect()
    }

    fn allowed(ids: &[IngredientId]) -> BTreeSet<IngredientId> {
        ids.iter().copied().collect()
    }

    /// Same data the demo seed uses: salt water, salad, water.
    fn demo_source() -> InMemoryRecipeSource {
        InMemoryRecipeSource::new()
            .with_recipe(
                1,
                "salt water",
                vec![RecipeIngredient::new(6, 10.0), RecipeIngredient::new(7, 1.0)],
            )
            .with_recipe(2, "salad", ingredients(&[1, 2, 3, 4, 5]))
            .with_recipe(3, "water", vec![RecipeIngredient::new(6, 10.0)])
    }

    #[test]
    fn test_all_ingredients_allowed() {
        let mut source = InMemoryRecipeSource::new()
            .with_recipe(1, "A", ingredients(&[1, 2, 3]))
            .with_recipe(2, "B", ingredients(&[1, 2, 3, 4, 5]));

        let result =
            filter_recipes_by_ingredients("", &allowed(&[1, 2, 3, 4, 5, 6]), &mut source).unwrap();
        assert_eq!(result, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_recipe_with_disallowed_ingredient_excluded() {
        let mut source = InMemoryRecipeSource::new()
            .with_recipe(1, "A", ingredients(&[1, 2, 3]))
            .with_recipe(2, "B", ingredients(&[1, 2, 3, 4, 5]));

        let result =
            filter_recipes_by_ingredients("", &allowed(&[1, 2, 3, 4]), &mut source).unwrap();
        assert_eq!(result, BTreeSet::from([1]));
    }

    #[test]
    fn test_name_substring_filter() {
        let mut source = demo_source();
        let result =
            filter_recipes_by_ingredients("alad", &allowed(&[1, 2, 3, 4, 5, 6]), &mut source)
                .unwrap();
        assert_eq!(result, BTreeSet::from([2]));

        let result =
            filter_recipes_by_ingredients("alad", &allowed(&[1, 2, 3, 4, 6]), &mut source).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_name_matches_everything() {
        let mut source = demo_source();
        let result =
            filter_recipes_by_ingredients("", &allowed(&[1, 2, 3, 4, 5, 6]), &mut source).unwrap();
        // salt water needs salt (7)
        assert_eq!(result, BTreeSet::from([2, 3]));
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        let mut source = demo_source();
        let result =
            filter_recipes_by_ingredients("Salad", &allowed(&[1, 2, 3, 4, 5]), &mut source)
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_recipe_without_ingredients_qualifies() {
        let mut source = InMemoryRecipeSource::new().with_recipe(9, "air", vec![]);
        let result = filter_recipes_by_ingredients("air", &allowed(&[]), &mut source).unwrap();
        assert_eq!(result, BTreeSet::from([9]));
    }

    #[test]
    fn test_empty_allowed_set_yields_nothing() {
        let mut source = demo_source();
        let result = filter_recipes_by_ingredients("", &allowed(&[]), &mut source).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut source = InMemoryRecipeSource::new();
        let result =
            filter_recipes_by_ingredients("", &allowed(&[1, 2, 3]), &mut source).unwrap();
        assert!(result.is_empty());

        let result = filter_recipes_by_ingredient_amounts(
            "",
            &allowed(&[1]),
            &HashMap::from([(1, 1.0)]),
            &mut source,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_amount_at_limit_qualifies() {
        let mut source =
            InMemoryRecipeSource::new().with_recipe(1, "A", vec![RecipeIngredient::new(1, 5.0)]);

        let result = filter_recipes_by_ingredient_amounts(
            "",
            &allowed(&[1]),
            &HashMap::from([(1, 5.0)]),
            &mut source,
        )
        .unwrap();
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn test_amount_over_limit_excluded() {
        let mut source =
            InMemoryRecipeSource::new().with_recipe(1, "A", vec![RecipeIngredient::new(1, 5.0)]);

        let result = filter_recipes_by_ingredient_amounts(
            "",
            &allowed(&[1]),
            &HashMap::from([(1, 4.0)]),
            &mut source,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_amounts_independent_of_order() {
        let mut source = demo_source();
        let max = HashMap::from([(1, 5.0), (3, 5.0), (4, 5.0), (2, 5.0), (5, 5.0), (6, 5.0)]);

        let result =
            filter_recipes_by_ingredient_amounts("alad", &allowed(&[1, 3, 4, 2, 5, 6]), &max, &mut source)
                .unwrap();
        assert_eq!(result, vec![2]);

        let tight = HashMap::from([(1, 5.0), (2, 5.0), (3, 5.0), (4, 4.0), (5, 5.0), (6, 5.0)]);
        let result =
            filter_recipes_by_ingredient_amounts("alad", &allowed(&[1, 2, 3, 4, 5, 6]), &tight, &mut source)
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_limit_disqualifies() {
        let mut source = InMemoryRecipeSource::new().with_recipe(
            1,
            "A",
            vec![RecipeIngredient::new(1, 1.0), RecipeIngredient::new(2, 1.0)],
        );

        let result = filter_recipes_by_ingredient_amounts(
            "",
            &allowed(&[1, 2]),
            &HashMap::from([(1, 10.0)]),
            &mut source,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_amount_results_ascending() {
        let mut source = InMemoryRecipeSource::new()
            .with_recipe(30, "soup c", ingredients(&[1]))
            .with_recipe(10, "soup a", ingredients(&[1]))
            .with_recipe(20, "soup b", ingredients(&[1]));

        let result = filter_recipes_by_ingredient_amounts(
            "soup",
            &allowed(&[1]),
            &HashMap::from([(1, 5.0)]),
            &mut source,
        )
        .unwrap();
        assert_eq!(result, vec![10, 20, 30]);
    }
}
