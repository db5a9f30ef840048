//! Cook time and difficulty estimation for recipes that are missing them.

use crate::config::{AnalysisConfig, ImportConfig};
use crate::model::{text_field, Difficulty, FieldMap, PENDING_COOK_TIME};
use crate::parsing::{ParseTarget, ResponseParser};
use crate::prompts::{analysis_prompt, description_prompt, strip_sentinel};
use crate::providers::LlmProvider;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, LazyLock};

pub const ALREADY_SET_REASONING: &str = "Already set by user or import";

static ESTIMATED_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""estimatedTime":\s*"([^"]+)""#).expect("Invalid estimatedTime regex")
});

static DIFFICULTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""difficulty":\s*"([^"]+)""#).expect("Invalid difficulty regex"));

/// The recipe as known so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub estimated_time: String,
    pub difficulty: Difficulty,
}

impl AnalysisRequest {
    /// Both values are present and neither is a placeholder.
    pub fn is_complete(&self) -> bool {
        let time = self.estimated_time.trim();
        !time.is_empty() && time != PENDING_COOK_TIME && self.difficulty.is_determined()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAnalysis {
    pub estimated_time: String,
    pub difficulty: Difficulty,
    pub time_reasoning: String,
    pub difficulty_reasoning: String,
    /// Generated only when the request had no description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct RecipeAnalyzer {
    provider: Arc<dyn LlmProvider>,
    parser: ResponseParser,
    config: AnalysisConfig,
    max_tokens: u32,
}

impl RecipeAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ImportConfig) -> Self {
        Self {
            parser: ResponseParser::new(provider.clone(), config.generation.repair_max_tokens),
            provider,
            config: config.analysis.clone(),
            max_tokens: config.generation.analysis_max_tokens,
        }
    }

    /// Never fails. Anything the model gets wrong is replaced by a safe default.
    pub async fn analyze(&self, request: &AnalysisRequest) -> RecipeAnalysis {
        if request.is_complete() {
            debug!(
                "Skipping analysis, recipe already has time ({}) and difficulty ({})",
                request.estimated_time, request.difficulty
            );
            return RecipeAnalysis {
                estimated_time: request.estimated_time.clone(),
                difficulty: request.difficulty,
                time_reasoning: ALREADY_SET_REASONING.to_string(),
                difficulty_reasoning: ALREADY_SET_REASONING.to_string(),
                description: None,
            };
        }

        let prompt = analysis_prompt(
            &request.title,
            &request.description,
            &request.ingredients,
            &request.instructions,
        );

        let mut analysis = match self.provider.generate(&prompt, self.max_tokens).await {
            Ok(response) => self.read_analysis(&response).await,
            Err(e) => {
                warn!("Recipe analysis failed: {}", e);
                self.validated(&FieldMap::new())
            }
        };

        if request.description.trim().is_empty() {
            analysis.description = self.generate_description(request).await;
        }

        info!(
            "Analyzed '{}': {} min, {}",
            request.title, analysis.estimated_time, analysis.difficulty
        );
        analysis
    }

    async fn read_analysis(&self, response: &str) -> RecipeAnalysis {
        let fields = self.parser.parse(response, ParseTarget::Analysis).await;
        if !fields.is_empty() {
            return self.validated(&fields);
        }

        debug!("Analysis response was not JSON, trying manual extraction");
        self.validated(&manual_fields(response))
    }

    fn validated(&self, fields: &FieldMap) -> RecipeAnalysis {
        let estimated_time = text_field(fields, "estimatedTime")
            .and_then(|time| time.parse::<u32>().ok())
            .filter(|minutes| (self.config.min_minutes..=self.config.max_minutes).contains(minutes))
            .unwrap_or_else(|| {
                debug!("Invalid estimatedTime, using default");
                self.config.default_minutes
            });

        let difficulty = text_field(fields, "difficulty")
            .and_then(|difficulty| Difficulty::parse_strict(&difficulty))
            .unwrap_or(Difficulty::Medium);

        RecipeAnalysis {
            estimated_time: estimated_time.to_string(),
            difficulty,
            time_reasoning: text_field(fields, "timeReasoning").unwrap_or_default(),
            difficulty_reasoning: text_field(fields, "difficultyReasoning").unwrap_or_default(),
            description: None,
        }
    }

    async fn generate_description(&self, request: &AnalysisRequest) -> Option<String> {
        let prompt = description_prompt(&request.title, &request.ingredients, &request.instructions);
        match self.provider.generate(&prompt, self.max_tokens).await {
            Ok(response) => clean_description(&response, self.config.description_max_chars),
            Err(e) => {
                warn!("Description generation failed: {}", e);
                None
            }
        }
    }
}

/// Pulls `"estimatedTime": "..."` and `"difficulty": "..."` out of text that is not valid JSON.
fn manual_fields(response: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    for (key, regex) in [("estimatedTime", &ESTIMATED_TIME), ("difficulty", &DIFFICULTY)] {
        if let Some(caps) = regex.captures(response) {
            fields.insert(key.to_string(), Value::String(caps[1].to_string()));
        }
    }
    fields
}

/// Strips emphasis markers and caps the length, ending cut text with `...`.
fn clean_description(response: &str, max_chars: usize) -> Option<String> {
    let description = strip_sentinel(response).replace('*', "");
    let description = description.trim();
    if description.is_empty() {
        return None;
    }

    if description.chars().count() > max_chars {
        let kept: String = description.chars().take(max_chars.saturating_sub(3)).collect();
        Some(format!("{}...", kept))
    } else {
        Some(description.to_string())
    }
}
