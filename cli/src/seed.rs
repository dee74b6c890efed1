use anyhow::{bail, Context, Result};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use crate::client::ApiClient;

const SEED_INGREDIENTS: &[(&str, &str)] = &[
    ("carrots", "count"),
    ("lettuce", "count"),
    ("mushrooms", "count"),
    ("cucumber", "count"),
    ("ranch dressing", "volume"),
    ("water", "volume"),
    ("salt", "mass"),
];

struct SeedRecipe {
    name: &'static str,
    description: &'static str,
    prep_minutes: i32,
    steps: &'static [&'static str],
    ingredients: &'static [(&'static str, f64)], // (ingredient name, amount in base unit)
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        name: "salt water",
        description: "Water, but salty.",
        prep_minutes: 420,
        steps: &["add water", "add salt"],
        ingredients: &[("water", 10.0), ("salt", 1.0)],
    },
    SeedRecipe {
        name: "salad",
        description: "A simple garden salad with ranch.",
        prep_minutes: 360,
        steps: &["add vegetables into bowl", "mix", "add dressing"],
        ingredients: &[
            ("carrots", 5.0),
            ("lettuce", 5.0),
            ("mushrooms", 5.0),
            ("cucumber", 5.0),
            ("ranch dressing", 5.0),
        ],
    },
    SeedRecipe {
        name: "water",
        description: "Literally just water.",
        prep_minutes: 1,
        steps: &["literally just water"],
        ingredients: &[("water", 10.0)],
    },
];

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct IngredientItem {
    id: i32,
    name: String,
}

#[derive(Deserialize)]
struct IngredientsResponse {
    ingredients: Vec<IngredientItem>,
}

#[derive(Deserialize)]
struct CreatedRecipe {
    id: i32,
}

/// Create any missing seed ingredients and return every ingredient id by name.
async fn ensure_ingredients(client: &ApiClient) -> Result<HashMap<String, i32>> {
    for (name, measure) in SEED_INGREDIENTS {
        let body = json!({ "name": name, "measure": measure });
        let (status, text) = client
            .send(Method::POST, "/api/ingredients", Some(&body))
            .await?;
        match status {
            StatusCode::CREATED => println!("  Created ingredient: {}", name),
            StatusCode::CONFLICT => println!("  Ingredient exists: {}", name),
            other => bail!("Failed to create ingredient {}: {} {}", name, other, text),
        }
    }

    let existing: IngredientsResponse = client
        .get("/api/ingredients")
        .await
        .context("Failed to list ingredients")?;
    Ok(existing
        .ingredients
        .into_iter()
        .map(|i| (i.name, i.id))
        .collect())
}

pub async fn seed(server: &str, username: &str, password: &str) -> Result<()> {
    let mut client = ApiClient::new(server);
    let credentials = Credentials { username, password };

    // Try to log in first; if the user exists, skip seeding
    let (status, text) = client
        .send(Method::POST, "/api/auth/login", Some(&credentials))
        .await?;
    if status.is_success() {
        println!("User '{}' already exists, skipping seed", username);
        return Ok(());
    }
    tracing::debug!(%status, body = %text, "Login failed, signing up");

    let signup: TokenResponse = client
        .post("/api/auth/signup", &credentials)
        .await
        .context("Failed to create user")?;
    println!("Created new user: {}", username);
    client.set_token(signup.token);

    println!("Creating {} ingredients...", SEED_INGREDIENTS.len());
    let ingredient_ids = ensure_ingredients(&client).await?;

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());
    for recipe in SAMPLE_RECIPES {
        let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
        for (name, amount) in recipe.ingredients {
            let id = ingredient_ids
                .get(*name)
                .with_context(|| format!("Ingredient {} was not created", name))?;
            ingredients.push(json!({ "ingredient_id": id, "amount": amount }));
        }

        let body = json!({
            "name": recipe.name,
            "description": recipe.description,
            "prep_minutes": recipe.prep_minutes,
            "steps": recipe.steps,
            "ingredients": ingredients,
        });
        let created: CreatedRecipe = client
            .post("/api/recipes", &body)
            .await
            .with_context(|| format!("Failed to create recipe: {}", recipe.name))?;

        println!("  Created: {} (id {})", recipe.name, created.id);
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE");
    println!("{}", "=".repeat(50));
    println!("Username: {}", username);
    println!("Password: {}", password);
    println!("Base URL: {}", server);
    println!("{}", "=".repeat(50));

    Ok(())
}
