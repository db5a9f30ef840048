use crate::config::ProviderConfig;
use crate::providers::{strip_prompt_echo, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

/// Self-hosted models served by Ollama, driven through the raw completion endpoint.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(OllamaProvider {
            client: Client::new(),
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
            temperature: 0.3,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": self.temperature,
                    "num_predict": max_tokens
                }
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("Ollama response: {:?}", response_body);

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let error_message = error.as_str().unwrap_or("Unknown error");
            return Err(format!("Ollama API error: {}", error_message).into());
        }

        let text = response_body["response"].as_str().ok_or_else(|| {
            format!(
                "Failed to extract content from Ollama response. Response: {}",
                response_body
            )
        })?;

        Ok(strip_prompt_echo(prompt, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_ollama_generate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "zephyr",
                "stream": false,
                "options": {"num_predict": 200}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model": "zephyr", "response": " {\"cookTime\": \"25\"}", "done": true}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::with_base_url(server.url(), "zephyr".to_string());
        let result = provider.generate("Fixed JSON:", 200).await.unwrap();

        assert_eq!(result, "{\"cookTime\": \"25\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ollama_error_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "model 'zephyr' not found"}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::with_base_url(server.url(), "zephyr".to_string());
        let err = provider.generate("prompt", 10).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_default_base_url() {
        let config = ProviderConfig {
            enabled: true,
            model: "zephyr".to_string(),
            temperature: 0.3,
            api_key: None,
            base_url: None,
        };

        let provider = OllamaProvider::new(&config).unwrap();
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.provider_name(), "ollama");
    }
}
