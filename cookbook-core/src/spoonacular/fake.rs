//! In-memory Spoonacular stand-in for tests.

use std::sync::RwLock;

use async_trait::async_trait;

use super::{SpoonacularApi, SpoonacularRecipe};
use crate::error::SpoonacularError;

/// Serves a fixed list of recipes.
///
/// Both calls return the recipes whose title contains the tag or query,
/// ignoring case, capped at `number`. Every call is recorded.
#[derive(Debug, Default)]
pub struct FakeSpoonacular {
    recipes: Vec<SpoonacularRecipe>,
    fail_with_status: Option<u16>,
    calls: RwLock<Vec<String>>,
}

impl FakeSpoonacular {
    pub fn new(recipes: Vec<SpoonacularRecipe>) -> Self {
        Self {
            recipes,
            ..Default::default()
        }
    }

    /// Make every call fail with an API error of the given status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    /// Calls made so far, as `"random:<tag>"` or `"keyword:<query>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), SpoonacularError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(call);
        }
        match self.fail_with_status {
            Some(status) => Err(SpoonacularError::ApiError {
                status,
                message: "fake failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn matching(&self, needle: &str, number: u32) -> Vec<SpoonacularRecipe> {
        let needle = needle.to_lowercase();
        self.recipes
            .iter()
            .filter(|r| {
                r.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .take(number as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SpoonacularApi for FakeSpoonacular {
    async fn random_recipes(
        &self,
        tag: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError> {
        self.record(format!("random:{}", tag))?;
        Ok(self.matching(tag, number))
    }

    async fn recipes_by_keyword(
        &self,
        query: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError> {
        self.record(format!("keyword:{}", query))?;
        Ok(self.matching(query, number))
    }
}
