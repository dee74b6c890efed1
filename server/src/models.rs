use chrono::{DateTime, Utc};
use cookbook_core::{MeasureKind, MeasurePreference};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub prefers_metric_volume: bool,
    pub prefers_metric_mass: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn measure_preference(&self) -> MeasurePreference {
        MeasurePreference::new(self.prefers_metric_volume, self.prefers_metric_mass)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    /// Rows are constrained to known kinds; anything else reads as a count.
    pub fn measure_kind(&self) -> MeasureKind {
        MeasureKind::from_str(&self.measure).unwrap_or(MeasureKind::Count)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub measure: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub prep_minutes: i32,
    pub steps: String,
    pub rating: f64,
    pub description: String,
    pub source_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub name: &'a str,
    pub prep_minutes: i32,
    pub steps: &'a str,
    pub rating: f64,
    pub description: &'a str,
    pub source_url: Option<&'a str>,
    pub created_by: Option<Uuid>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: f64,
    pub position: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::user_recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct UserRecipe {
    pub user_id: Uuid,
    pub recipe_id: i32,
    pub saved: bool,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_recipes)]
pub struct NewUserRecipe<'a> {
    pub user_id: Uuid,
    pub recipe_id: i32,
    pub saved: bool,
    pub rating: Option<f64>,
    pub review: Option<&'a str>,
}
