//! Golden file tests for Spoonacular recipe import.
//!
//! Each JSON file in `fixtures/spoonacular/` holds a raw API recipe and the
//! recipe we expect to import from it:
//!
//! ```json
//! {
//!   "response": { "id": 1, "title": "Tea", ... },
//!   "expected": { "name": "Tea", "prep_minutes": 5, "ingredients": [...], ... }
//! }
//! ```

use cookbook_core::spoonacular::{parse_recipe, FakeSpoonacular, SpoonacularApi, SpoonacularRecipe};
use cookbook_core::{MeasureKind, SpoonacularError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TestCase {
    response: SpoonacularRecipe,
    expected: ExpectedRecipe,
}

#[derive(Debug, Deserialize)]
struct ExpectedRecipe {
    name: String,
    prep_minutes: i32,
    rating: f64,
    steps: String,
    description: String,
    source_url: Option<String>,
    ingredients: Vec<ExpectedIngredient>,
}

#[derive(Debug, Deserialize)]
struct ExpectedIngredient {
    name: String,
    measure: MeasureKind,
    amount: f64,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/spoonacular");

    let mut cases = Vec::new();
    for entry in fs::read_dir(&fixtures_dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read directory entry").path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            let case: TestCase = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
            cases.push((name, case));
        }
    }
    cases.sort_by(|a, b| a.0.cmp(&b.0));

    assert!(
        !cases.is_empty(),
        "No test fixtures found in {:?}",
        fixtures_dir
    );
    cases
}

#[test]
fn test_spoonacular_golden_files() {
    for (name, case) in load_test_cases() {
        println!("Testing: {}", name);

        let imported = parse_recipe(&case.response)
            .unwrap_or_else(|| panic!("Recipe was skipped for {}", name));
        let expected = &case.expected;

        assert_eq!(imported.name, expected.name, "Name mismatch for {}", name);
        assert_eq!(
            imported.prep_minutes, expected.prep_minutes,
            "Time mismatch for {}",
            name
        );
        assert!(
            (imported.rating - expected.rating).abs() < 1e-9,
            "Rating mismatch for {}: {} != {}",
            name,
            imported.rating,
            expected.rating
        );
        assert_eq!(
            imported.steps, expected.steps,
            "Steps mismatch for {}\n\nExpected:\n{}\n\nActual:\n{}",
            name, expected.steps, imported.steps
        );
        assert_eq!(
            imported.description, expected.description,
            "Description mismatch for {}",
            name
        );
        assert_eq!(
            imported.source_url, expected.source_url,
            "Source URL mismatch for {}",
            name
        );

        assert_eq!(
            imported.ingredients.len(),
            expected.ingredients.len(),
            "Ingredient count mismatch for {}: {:?}",
            name,
            imported.ingredients
        );
        for (actual, wanted) in imported.ingredients.iter().zip(&expected.ingredients) {
            assert_eq!(actual.name, wanted.name, "Ingredient order mismatch for {}", name);
            assert_eq!(
                actual.measure, wanted.measure,
                "Measure mismatch for {} / {}",
                name, wanted.name
            );
            assert!(
                (actual.amount - wanted.amount).abs() < 1e-6,
                "Amount mismatch for {} / {}: {} != {}",
                name,
                wanted.name,
                actual.amount,
                wanted.amount
            );
        }
    }
}

fn fixture_recipes() -> Vec<SpoonacularRecipe> {
    load_test_cases()
        .into_iter()
        .map(|(_, case)| case.response)
        .collect()
}

#[tokio::test]
async fn test_fake_keyword_search() {
    let api = FakeSpoonacular::new(fixture_recipes());

    let recipes = api.recipes_by_keyword("pasta", 10).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].id, 715538);

    let recipes = api.recipes_by_keyword("TEA", 10).await.unwrap();
    assert_eq!(recipes.len(), 1);

    assert_eq!(api.calls(), vec!["keyword:pasta", "keyword:TEA"]);
}

#[tokio::test]
async fn test_fake_random_respects_number() {
    let api = FakeSpoonacular::new(fixture_recipes());

    let recipes = api.random_recipes("", 1).await.unwrap();
    assert_eq!(recipes.len(), 1);

    let recipes = api.random_recipes("", 100).await.unwrap();
    assert_eq!(recipes.len(), 2);
}

#[tokio::test]
async fn test_fake_failure() {
    let api = FakeSpoonacular::failing(402);
    let result = api.random_recipes("vegan", 5).await;
    assert!(matches!(
        result,
        Err(SpoonacularError::ApiError { status: 402, .. })
    ));
}

#[test]
fn test_random_response_shape() {
    let body = r#"{"recipes": [{"id": 1, "title": "Toast"}, {"id": 2}]}"#;
    let response: cookbook_core::spoonacular::RandomRecipesResponse =
        serde_json::from_str(body).unwrap();
    assert_eq!(response.recipes.len(), 2);

    let imported: Vec<_> = response.recipes.iter().filter_map(parse_recipe).collect();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name, "Toast");
}
