//! reqwest-backed Spoonacular client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{AutocompleteHit, RandomRecipesResponse, SpoonacularApi, SpoonacularRecipe};
use crate::error::SpoonacularError;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SpoonacularErrorBody {
    message: String,
}

/// Spoonacular REST client.
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl SpoonacularClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SpoonacularError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Build a client from `SPOONACULAR_API_KEY`.
    pub fn from_env() -> Result<Self, SpoonacularError> {
        let api_key = std::env::var("SPOONACULAR_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SpoonacularError::NotConfigured("SPOONACULAR_API_KEY not set".to_string())
            })?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpoonacularError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Spoonacular request");

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if status != 200 {
            let message = serde_json::from_str::<SpoonacularErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(SpoonacularError::ApiError { status, message });
        }

        serde_json::from_str(&body).map_err(|e| SpoonacularError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl SpoonacularApi for SpoonacularClient {
    async fn random_recipes(
        &self,
        tag: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError> {
        let response: RandomRecipesResponse = self
            .get(
                "/recipes/random",
                &[("number", number.to_string()), ("tags", tag.to_string())],
            )
            .await?;
        Ok(response.recipes)
    }

    async fn recipes_by_keyword(
        &self,
        query: &str,
        number: u32,
    ) -> Result<Vec<SpoonacularRecipe>, SpoonacularError> {
        let hits: Vec<AutocompleteHit> = self
            .get(
                "/recipes/autocomplete",
                &[("query", query.to_string()), ("number", number.to_string())],
            )
            .await?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids = hits
            .iter()
            .map(|h| h.id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.get(
            "/recipes/informationBulk",
            &[("ids", ids), ("includeNutrition", "false".to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_trims_slash() {
        let client = SpoonacularClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = SpoonacularClient::new("key")
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let result = client.random_recipes("vegan", 1).await;
        assert!(matches!(result, Err(SpoonacularError::RequestFailed(_))));
    }
}
