mod anthropic;
mod factory;
mod fallback;
mod ollama;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for all text-generation backends.
///
/// Implementations must be safe to call from concurrent imports; the importer
/// shares one instance behind an `Arc`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama")
    fn provider_name(&self) -> &str;

    /// Complete `prompt`, returning only the newly generated text
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// Drops a leading copy of the prompt that completion-style backends echo back.
pub(crate) fn strip_prompt_echo(prompt: &str, output: &str) -> String {
    output
        .strip_prefix(prompt)
        .unwrap_or(output)
        .trim()
        .to_string()
}
