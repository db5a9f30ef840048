use crate::analyzer::{AnalysisRequest, RecipeAnalyzer};
use crate::builder::RecipeImporterBuilder;
use crate::config::ImportConfig;
use crate::cook_time::extract_cook_time;
use crate::error::ImportError;
use crate::fetchers::PageRenderer;
use crate::html::{clean_html, extract_image_candidates, select_best_image};
use crate::model::{
    list_field, text_field, Difficulty, FieldMap, RecipeExtraction, DEFAULT_TITLE,
    PENDING_COOK_TIME,
};
use crate::parsing::{parse_markdown, ParseTarget, ResponseParser};
use crate::prompts::{
    cook_time_difficulty_prompt, markdown_prompt, recipe_fields_prompt, strip_sentinel,
};
use crate::providers::LlmProvider;
use log::{debug, error, info, warn};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const IMPORTED_REASONING: &str = "Imported from recipe";
pub const PAGE_TEXT_REASONING: &str = "Extracted from page text";

/// Imports recipes from web pages.
///
/// One importer can serve many concurrent imports; it holds no per-import state.
pub struct RecipeImporter {
    provider: Arc<dyn LlmProvider>,
    renderer: Arc<dyn PageRenderer>,
    parser: ResponseParser,
    analyzer: RecipeAnalyzer,
    config: ImportConfig,
}

impl RecipeImporter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        renderer: Arc<dyn PageRenderer>,
        config: ImportConfig,
    ) -> Self {
        Self {
            parser: ResponseParser::new(provider.clone(), config.generation.repair_max_tokens),
            analyzer: RecipeAnalyzer::new(provider.clone(), &config),
            provider,
            renderer,
            config,
        }
    }

    /// Create a new builder for configuring an importer
    ///
    /// # Example
    /// ```no_run
    /// use recipe_import::RecipeImporter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().provider_name("ollama").build()?;
    /// let recipe = importer.import("https://example.com/recipe").await;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    pub fn provider(&self) -> Arc<dyn LlmProvider> {
        self.provider.clone()
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &RecipeAnalyzer {
        &self.analyzer
    }

    /// Imports the recipe at `url`.
    ///
    /// Never fails: when the page cannot be loaded the returned record is tagged
    /// `error` and its description holds the reason.
    pub async fn import(&self, url: &str) -> RecipeExtraction {
        match self.try_import(url).await {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("Import of {} failed: {}", url, e);
                RecipeExtraction::failed(e)
            }
        }
    }

    async fn try_import(&self, url: &str) -> Result<RecipeExtraction, ImportError> {
        Url::parse(url)?;
        info!(
            "Importing {} with {} renderer and {} provider",
            url,
            self.renderer.renderer_name(),
            self.provider.provider_name()
        );

        let timeout = Duration::from_millis(self.config.renderer.timeout_ms);
        let html = self.renderer.render(url, timeout).await?;

        let candidates = {
            let document = Html::parse_document(&html);
            extract_image_candidates(&document, url)
        };
        let page_text = clean_html(&html, url, &self.config.cleaner);
        debug!("Cleaned page text is {} chars", page_text.chars().count());

        let mut fields = self.extract_recipe_fields(&page_text).await;
        fields.extend(self.extract_time_and_difficulty(&page_text).await);

        let mut recipe = self.build_record(&fields, &candidates, &page_text);
        if self.needs_analysis(&recipe) {
            self.fill_from_analysis(&mut recipe).await;
        }

        info!(
            "Imported '{}' ({} ingredients, {} steps)",
            recipe.title,
            recipe.ingredients.len(),
            recipe.instructions.len()
        );
        Ok(recipe)
    }

    /// Generation failures read as empty output so the cascade can fall through.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> String {
        match self.provider.generate(prompt, max_tokens).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation with {} failed: {}", self.provider.provider_name(), e);
                String::new()
            }
        }
    }

    async fn extract_recipe_fields(&self, page_text: &str) -> FieldMap {
        let max_tokens = self.config.generation.extraction_max_tokens;

        let raw = self.generate(&recipe_fields_prompt(page_text), max_tokens).await;
        let fields = self.parser.parse(&raw, ParseTarget::RecipeFields).await;
        if !fields.is_empty() {
            return fields;
        }

        debug!("JSON extraction unusable, asking for markdown");
        let raw = self.generate(&markdown_prompt(page_text), max_tokens).await;
        parse_markdown(&strip_sentinel(&raw))
    }

    async fn extract_time_and_difficulty(&self, page_text: &str) -> FieldMap {
        let raw = self
            .generate(
                &cook_time_difficulty_prompt(page_text),
                self.config.generation.time_max_tokens,
            )
            .await;
        self.parser.parse(&raw, ParseTarget::TimeDifficulty).await
    }

    fn build_record(&self, fields: &FieldMap, candidates: &[String], page_text: &str) -> RecipeExtraction {
        let mut recipe = RecipeExtraction {
            title: decoded_text(fields, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: decoded_text(fields, "description").unwrap_or_default(),
            ingredients: decoded_list(fields, "ingredients"),
            instructions: decoded_list(fields, "instructions"),
            image_url: self.choose_image(fields, candidates),
            ..Default::default()
        };

        match model_cook_time(fields) {
            Some(minutes) => {
                recipe.cook_time = minutes.to_string();
                recipe.time_reasoning = IMPORTED_REASONING.to_string();
            }
            None => {
                if let Some(minutes) = extract_cook_time(page_text) {
                    recipe.cook_time = minutes;
                    recipe.time_reasoning = PAGE_TEXT_REASONING.to_string();
                }
            }
        }

        recipe.difficulty = text_field(fields, "difficulty")
            .map(|difficulty| Difficulty::from_model(&difficulty))
            .unwrap_or_default();
        if recipe.difficulty.is_determined() {
            recipe.difficulty_reasoning = IMPORTED_REASONING.to_string();
        }

        recipe
    }

    /// The model's image is only trusted when it is one of the page's own images.
    fn choose_image(&self, fields: &FieldMap, candidates: &[String]) -> String {
        if let Some(proposed) = text_field(fields, "imageUrl") {
            if candidates.contains(&proposed) {
                return proposed;
            }
            debug!("Ignoring model image {} not found on the page", proposed);
        }
        select_best_image(candidates, &self.config.images)
    }

    fn needs_analysis(&self, recipe: &RecipeExtraction) -> bool {
        let has_content = !recipe.ingredients.is_empty() || !recipe.instructions.is_empty();
        let missing = recipe.is_cook_time_pending() || !recipe.difficulty.is_determined();
        self.config.analysis.enabled && has_content && missing
    }

    async fn fill_from_analysis(&self, recipe: &mut RecipeExtraction) {
        let request = AnalysisRequest {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients_text(),
            instructions: recipe.instructions_text(),
            estimated_time: recipe.cook_time.clone(),
            difficulty: recipe.difficulty,
        };
        let analysis = self.analyzer.analyze(&request).await;

        if recipe.cook_time == PENDING_COOK_TIME {
            recipe.cook_time = analysis.estimated_time;
            recipe.time_reasoning = analysis.time_reasoning;
        }
        if !recipe.difficulty.is_determined() {
            recipe.difficulty = analysis.difficulty;
            recipe.difficulty_reasoning = analysis.difficulty_reasoning;
        }
        if recipe.description.is_empty() {
            if let Some(description) = analysis.description {
                recipe.description = description;
            }
        }
    }
}

/// Accepts a positive whole number of minutes, as a JSON number or numeric string.
fn model_cook_time(fields: &FieldMap) -> Option<u32> {
    text_field(fields, "cookTime")?
        .parse::<u32>()
        .ok()
        .filter(|minutes| *minutes > 0)
}

fn decoded_text(fields: &FieldMap, key: &str) -> Option<String> {
    text_field(fields, key).map(|text| html_escape::decode_html_entities(&text).into_owned())
}

fn decoded_list(fields: &FieldMap, key: &str) -> Vec<String> {
    list_field(fields, key)
        .into_iter()
        .map(|item| html_escape::decode_html_entities(&item).into_owned())
        .collect()
}
