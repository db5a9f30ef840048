use super::PageRenderer;
use crate::error::ImportError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};

/// Plain HTTP fetch. No JavaScript runs, so lazy-loaded content may be missing.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

#[async_trait]
impl PageRenderer for RequestFetcher {
    fn renderer_name(&self) -> &str {
        "request"
    }

    async fn render(&self, url: &str, limit: Duration) -> Result<String, ImportError> {
        // Limits past what Instant can represent wait for about a year
        let deadline = Instant::now()
            .checked_add(limit)
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(365 * 24 * 60 * 60));

        let mut response = timeout(limit, self.client.get(url).send())
            .await
            .map_err(|_| {
                ImportError::RenderError(format!("no response from {} within {:?}", url, limit))
            })??;

        if !response.status().is_success() {
            warn!("{} answered with {}, using the body anyway", url, response.status());
        }

        let mut body = Vec::new();
        loop {
            match timeout_at(deadline, response.chunk()).await {
                Ok(Ok(Some(chunk))) => body.extend_from_slice(&chunk),
                Ok(Ok(None)) => break,
                Ok(Err(e)) if body.is_empty() => return Err(e.into()),
                Ok(Err(e)) => {
                    warn!("Body of {} cut short ({}), keeping {} bytes", url, e, body.len());
                    break;
                }
                Err(_) => {
                    warn!("Timed out reading {}, keeping {} bytes", url, body.len());
                    break;
                }
            }
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_render_returns_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", "RecipeBot/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><h1>Soup</h1></body></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new("RecipeBot/1.0");
        let html = fetcher
            .render(&format!("{}/recipe", server.url()), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(html.contains("<h1>Soup</h1>"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_render_keeps_error_pages() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/blocked")
            .with_status(403)
            .with_body("<html><body>Recipe behind a wall</body></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new("RecipeBot/1.0");
        let html = fetcher
            .render(&format!("{}/blocked", server.url()), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(html.contains("Recipe behind a wall"));
    }

    #[tokio::test]
    async fn test_render_unreachable_host_is_error() {
        let fetcher = RequestFetcher::new("RecipeBot/1.0");
        let result = fetcher
            .render("http://127.0.0.1:1/recipe", Duration::from_secs(2))
            .await;

        assert!(result.is_err());
    }
}
