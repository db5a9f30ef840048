use std::sync::Arc;
use std::time::Duration;

use crate::config::{ImportConfig, ProviderConfig};
use crate::fetchers::{duration_millis, ChromeFetcher, PageRenderer, RequestFetcher};
use crate::providers::{FallbackProvider, LlmProvider, ProviderFactory};
use crate::{ImportError, RecipeImporter};

/// Builder for configuring a [`RecipeImporter`]
#[derive(Default)]
pub struct RecipeImporterBuilder {
    config: Option<ImportConfig>,
    provider: Option<Arc<dyn LlmProvider>>,
    renderer: Option<Arc<dyn PageRenderer>>,
    provider_name: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl RecipeImporterBuilder {
    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an already constructed language model
    ///
    /// This takes precedence over [`provider_name`](Self::provider_name).
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use an already constructed page renderer
    pub fn renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Select a provider by name ("openai", "anthropic" or "ollama")
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder().provider_name("anthropic");
    /// ```
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    /// Set the API key for the selected provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the selected provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set how long the renderer may spend on a page
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder().timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - The configuration cannot be loaded
    /// - No provider is given and none can be created from the configuration
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let mut config = match self.config {
            Some(config) => config,
            None => ImportConfig::load()?,
        };

        if let Some(timeout) = self.timeout {
            config.renderer.timeout_ms = duration_millis(timeout);
        }

        let provider = match self.provider {
            Some(provider) => provider,
            None if self.provider_name.is_some() || self.api_key.is_some() || self.model.is_some() => {
                let name = self
                    .provider_name
                    .unwrap_or_else(|| config.default_provider.clone());
                let mut provider_config = config
                    .providers
                    .get(&name)
                    .cloned()
                    .unwrap_or_else(|| default_provider_config(&name));
                provider_config.enabled = true;
                if let Some(api_key) = self.api_key {
                    provider_config.api_key = Some(api_key);
                }
                if let Some(model) = self.model {
                    provider_config.model = model;
                }

                let provider = ProviderFactory::create(&name, &provider_config)
                    .map_err(|e| ImportError::BuilderError(e.to_string()))?;
                Arc::from(provider)
            }
            None => {
                let provider = FallbackProvider::new(&config)
                    .map_err(|e| ImportError::BuilderError(e.to_string()))?;
                Arc::new(provider)
            }
        };

        let renderer = match self.renderer {
            Some(renderer) => renderer,
            None => default_renderer(&config),
        };

        Ok(RecipeImporter::new(provider, renderer, config))
    }
}

/// Remote rendering when a page scriber is configured, plain HTTP otherwise
fn default_renderer(config: &ImportConfig) -> Arc<dyn PageRenderer> {
    if let Some(url) = &config.renderer.page_scriber_url {
        return Arc::new(ChromeFetcher::new(url));
    }
    match ChromeFetcher::from_env() {
        Some(chrome) => Arc::new(chrome),
        None => Arc::new(RequestFetcher::new(&config.renderer.user_agent)),
    }
}

fn default_provider_config(name: &str) -> ProviderConfig {
    let model = match name {
        "anthropic" => "claude-sonnet-4.5",
        "ollama" => "llama3",
        _ => "gpt-4o",
    };

    ProviderConfig {
        enabled: true,
        model: model.to_string(),
        temperature: 0.3,
        api_key: None,
        base_url: None,
    }
}
