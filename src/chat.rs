use crate::prompts::chat_prompt;
use crate::providers::LlmProvider;
use crate::search::RecipeSearch;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const APOLOGY: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again.";

/// Words too common to be useful search keywords.
const STOPWORDS: &[&str] = &[
    "and", "are", "can", "does", "for", "from", "have", "how", "into", "make", "should", "that",
    "the", "this", "what", "when", "where", "which", "with", "you", "your",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    pub recipes: Vec<Value>,
}

/// Cooking question answering, optionally backed by a recipe search.
pub struct ChatAssistant {
    provider: Arc<dyn LlmProvider>,
    search: Option<Arc<dyn RecipeSearch>>,
    max_tokens: u32,
}

impl ChatAssistant {
    pub fn new(provider: Arc<dyn LlmProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            search: None,
            max_tokens,
        }
    }

    pub fn with_search(mut self, search: Arc<dyn RecipeSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Never fails; a model error becomes an apology.
    pub async fn answer(&self, request: &ChatRequest) -> ChatResponse {
        let recipes = self.related_recipes(&request.question).await;

        match self
            .provider
            .generate(&chat_prompt(&request.question), self.max_tokens)
            .await
        {
            Ok(answer) => ChatResponse {
                answer: answer.trim().to_string(),
                recipes,
            },
            Err(e) => {
                error!("Chat generation failed: {}", e);
                ChatResponse {
                    answer: APOLOGY.to_string(),
                    recipes: Vec::new(),
                }
            }
        }
    }

    async fn related_recipes(&self, question: &str) -> Vec<Value> {
        let Some(search) = &self.search else {
            return Vec::new();
        };

        let keywords = keywords(question);
        if keywords.is_empty() {
            return Vec::new();
        }

        match search.search(&keywords).await {
            Ok(recipes) => {
                debug!("Found {} recipes for {:?}", recipes.len(), keywords);
                recipes
            }
            Err(e) => {
                warn!("Recipe search failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Distinct lowercase words of three or more letters, minus stopwords, in order of appearance.
pub fn keywords(question: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    question
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= 3 && !STOPWORDS.contains(&word.as_str()))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
