//! Recipe import from arbitrary web pages.
//!
//! A page is rendered, reduced to its readable text and handed to a language
//! model, whose free-form answer is recovered into a [`RecipeExtraction`].
//! Images come from the page itself, cook time falls back to the page text,
//! and anything still missing is estimated by the [`RecipeAnalyzer`].
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! let recipe = recipe_import::import_recipe("https://example.com/recipe").await;
//! println!("{} ({} min)", recipe.title, recipe.cook_time);
//! # }
//! ```

pub mod analyzer;
pub mod builder;
pub mod chat;
pub mod config;
pub mod cook_time;
pub mod error;
pub mod fetchers;
pub mod html;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod search;

pub use analyzer::{AnalysisRequest, RecipeAnalysis, RecipeAnalyzer};
pub use builder::RecipeImporterBuilder;
pub use chat::{ChatAssistant, ChatRequest, ChatResponse};
pub use config::ImportConfig;
pub use error::ImportError;
pub use fetchers::PageRenderer;
pub use model::{Difficulty, RecipeExtraction};
pub use pipeline::RecipeImporter;
pub use providers::LlmProvider;
pub use search::{BackendSearch, RecipeSearch};

/// Imports a recipe using the configuration from `config.toml` and the environment.
///
/// Never fails: configuration problems are reported the same way as a page
/// that could not be loaded, as a record tagged `error`.
pub async fn import_recipe(url: &str) -> RecipeExtraction {
    match RecipeImporter::builder().build() {
        Ok(importer) => importer.import(url).await,
        Err(e) => {
            log::error!("Could not set up the importer: {}", e);
            RecipeExtraction::failed(e)
        }
    }
}
