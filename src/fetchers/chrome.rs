use super::{duration_millis, PageRenderer};
use crate::error::ImportError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    timeout_ms: u64,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

/// Renders pages in a remote headless browser service.
pub struct ChromeFetcher {
    endpoint: String,
    client: Client,
}

impl ChromeFetcher {
    pub fn new(page_scriber_url: &str) -> Self {
        let endpoint = format!(
            "{}/api/fetch-content",
            page_scriber_url.trim_end_matches('/')
        );
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    /// Uses `PAGE_SCRIBER_URL` when it is set
    pub fn from_env() -> Option<Self> {
        let page_scriber_url = env::var("PAGE_SCRIBER_URL").ok()?;
        Some(Self::new(&page_scriber_url))
    }
}

#[async_trait]
impl PageRenderer for ChromeFetcher {
    fn renderer_name(&self) -> &str {
        "chrome"
    }

    async fn render(&self, url: &str, limit: Duration) -> Result<String, ImportError> {
        debug!("Rendering {} via {}", url, self.endpoint);

        // The service enforces the limit itself; allow a little slack for the round trip
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(limit.saturating_add(Duration::from_secs(5)))
            .json(&ContentRequest {
                url,
                timeout_ms: duration_millis(limit),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImportError::RenderError(format!(
                "Chrome fetch failed with status: {}",
                response.status()
            )));
        }

        let content: ContentResponse = response.json().await?;
        Ok(content.content)
    }
}
