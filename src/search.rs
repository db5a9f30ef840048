use crate::error::ImportError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Looks up stored recipes by keyword.
#[async_trait]
pub trait RecipeSearch: Send + Sync {
    async fn search(&self, keywords: &[String]) -> Result<Vec<Value>, ImportError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    keywords: &'a [String],
}

/// Client for the recipe backend's search endpoint.
pub struct BackendSearch {
    client: Client,
    endpoint: String,
}

impl BackendSearch {
    pub fn new(backend_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/recipes/search", backend_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl RecipeSearch for BackendSearch {
    async fn search(&self, keywords: &[String]) -> Result<Vec<Value>, ImportError> {
        debug!("Searching recipes for {:?}", keywords);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SearchRequest { keywords })
            .send()
            .await?
            .error_for_status()?;

        match response.json::<Value>().await? {
            Value::Array(recipes) => Ok(recipes),
            other => Err(ImportError::SearchError(format!(
                "Expected a list of recipes, got: {}",
                other
            ))),
        }
    }
}
