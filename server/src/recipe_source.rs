//! PostgreSQL-backed [`RecipeSource`] for the matcher.

use std::collections::BTreeSet;

use cookbook_core::{IngredientId, RecipeId, RecipeIngredient, RecipeSource};
use diesel::prelude::*;

use crate::db::contains_pattern;
use crate::schema::{recipe_ingredients, recipes};

pub struct PgRecipeSource<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgRecipeSource<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl RecipeSource for PgRecipeSource<'_> {
    type Error = diesel::result::Error;

    fn recipe_ids_by_name(
        &mut self,
        name_substring: &str,
    ) -> Result<BTreeSet<RecipeId>, Self::Error> {
        let ids: Vec<i32> = recipes::table
            .filter(recipes::name.like(contains_pattern(name_substring)))
            .select(recipes::id)
            .load(&mut *self.conn)?;
        Ok(ids.into_iter().collect())
    }

    fn recipe_ids_with_disallowed_ingredients(
        &mut self,
        name_substring: &str,
        allowed: &BTreeSet<IngredientId>,
    ) -> Result<BTreeSet<RecipeId>, Self::Error> {
        let allowed: Vec<i32> = allowed.iter().copied().collect();
        let ids: Vec<i32> = recipe_ingredients::table
            .inner_join(recipes::table)
            .filter(recipes::name.like(contains_pattern(name_substring)))
            .filter(recipe_ingredients::ingredient_id.ne_all(allowed))
            .select(recipe_ingredients::recipe_id)
            .distinct()
            .load(&mut *self.conn)?;
        Ok(ids.into_iter().collect())
    }

    fn recipe_ingredients(
        &mut self,
        recipe_id: RecipeId,
    ) -> Result<Vec<RecipeIngredient>, Self::Error> {
        let rows: Vec<(i32, f64)> = recipe_ingredients::table
            .filter(recipe_ingredients::recipe_id.eq(recipe_id))
            .order((
                recipe_ingredients::position.asc(),
                recipe_ingredients::ingredient_id.asc(),
            ))
            .select((recipe_ingredients::ingredient_id, recipe_ingredients::amount))
            .load(&mut *self.conn)?;
        Ok(rows
            .into_iter()
            .map(|(ingredient_id, amount)| RecipeIngredient::new(ingredient_id, amount))
            .collect())
    }
}
