//! Turns free-form model output into a field map.
//!
//! JSON responses go through a cascade of increasingly permissive strategies,
//! the last of which asks the model to repair its own output. Markdown
//! responses from the fallback prompt are read by [`parse_markdown`].

mod json;
mod markdown;

pub use json::{balanced_object, parse_object};
pub use markdown::parse_markdown;

use crate::model::FieldMap;
use crate::prompts::{json_repair_prompt, strip_sentinel};
use crate::providers::LlmProvider;
use log::{debug, warn};
use std::sync::Arc;

/// What a response is expected to describe. A parse is only accepted when it
/// carries at least one of the target's key fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTarget {
    RecipeFields,
    TimeDifficulty,
    Analysis,
}

impl ParseTarget {
    pub fn key_fields(&self) -> &'static [&'static str] {
        match self {
            ParseTarget::RecipeFields => &["title", "ingredients", "instructions"],
            ParseTarget::TimeDifficulty => &["cookTime", "difficulty"],
            ParseTarget::Analysis => &["estimatedTime", "difficulty"],
        }
    }

    /// True when `fields` is non-empty and has any key field.
    pub fn accepts(&self, fields: &FieldMap) -> bool {
        !fields.is_empty() && self.key_fields().iter().any(|key| fields.contains_key(*key))
    }
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Direct,
    Balanced,
    ModelRepair,
}

const STRATEGIES: [Strategy; 3] = [Strategy::Direct, Strategy::Balanced, Strategy::ModelRepair];

enum Attempt {
    Accepted(FieldMap),
    TryNext,
}

impl Attempt {
    fn check(fields: Option<FieldMap>, target: ParseTarget) -> Self {
        match fields {
            Some(fields) if target.accepts(&fields) => Attempt::Accepted(fields),
            _ => Attempt::TryNext,
        }
    }
}

/// Runs the JSON recovery cascade. Holds the provider used for repair calls.
pub struct ResponseParser {
    provider: Arc<dyn LlmProvider>,
    repair_max_tokens: u32,
}

impl ResponseParser {
    pub fn new(provider: Arc<dyn LlmProvider>, repair_max_tokens: u32) -> Self {
        Self {
            provider,
            repair_max_tokens,
        }
    }

    /// Returns the first accepted field map, or an empty map when every
    /// strategy fails.
    pub async fn parse(&self, raw: &str, target: ParseTarget) -> FieldMap {
        let text = strip_sentinel(raw);

        for strategy in STRATEGIES {
            match self.attempt(strategy, &text, target).await {
                Attempt::Accepted(fields) => {
                    debug!("{:?} response parsed with {:?} strategy", target, strategy);
                    return fields;
                }
                Attempt::TryNext => {}
            }
        }

        debug!("No strategy could parse the {:?} response", target);
        FieldMap::new()
    }

    async fn attempt(&self, strategy: Strategy, text: &str, target: ParseTarget) -> Attempt {
        match strategy {
            Strategy::Direct => Attempt::check(parse_object(text), target),
            Strategy::Balanced => Attempt::check(balanced_object(text).and_then(parse_object), target),
            Strategy::ModelRepair => {
                // Only output that started as JSON is worth repairing
                if !text.starts_with('{') {
                    return Attempt::TryNext;
                }

                match self
                    .provider
                    .generate(&json_repair_prompt(text), self.repair_max_tokens)
                    .await
                {
                    Ok(repaired) => {
                        let repaired = strip_sentinel(&repaired);
                        Attempt::check(balanced_object(&repaired).and_then(parse_object), target)
                    }
                    Err(e) => {
                        warn!("JSON repair request failed: {}", e);
                        Attempt::TryNext
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{list_field, text_field};
    use async_trait::async_trait;
    use std::error::Error;
    use std::sync::Mutex;

    /// Answers every repair request with the same text and records the prompts.
    struct RepairProvider {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RepairProvider {
        fn new(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(String::from).map_err(String::from),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for RepairProvider {
        fn provider_name(&self) -> &str {
            "repair"
        }

        async fn generate(
            &self,
            prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|e| e.into())
        }
    }

    fn parser(provider: &Arc<RepairProvider>) -> ResponseParser {
        ResponseParser::new(provider.clone(), 200)
    }

    #[tokio::test]
    async fn test_direct_parse_keeps_exact_values() {
        let provider = RepairProvider::new(Ok("{}"));
        let raw = r#"{"title": "Pad Thai", "ingredients": ["rice noodles", "tamarind"], "instructions": ["Soak", "Fry"]}
---END---"#;

        let fields = parser(&provider).parse(raw, ParseTarget::RecipeFields).await;

        assert_eq!(text_field(&fields, "title").as_deref(), Some("Pad Thai"));
        assert_eq!(list_field(&fields, "ingredients"), vec!["rice noodles", "tamarind"]);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_balanced_extraction_from_chatter() {
        let provider = RepairProvider::new(Ok("{}"));
        let raw = r#"Sure! {"title":"X"} Hope that helps"#;

        let fields = parser(&provider).parse(raw, ParseTarget::RecipeFields).await;

        assert_eq!(fields.len(), 1);
        assert_eq!(text_field(&fields, "title").as_deref(), Some("X"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_truncated_json_is_repaired_by_model() {
        let provider = RepairProvider::new(Ok(
            r#"Here you go: {"title": "Soup", "ingredients": ["salt"]}"#,
        ));
        let raw = r#"{"title": "Soup", "ingredients": ["salt""#;

        let fields = parser(&provider).parse(raw, ParseTarget::RecipeFields).await;

        assert_eq!(text_field(&fields, "title").as_deref(), Some("Soup"));
        assert_eq!(provider.calls(), 1);
        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains(raw));
        assert!(prompts[0].ends_with("Fixed JSON:"));
    }

    #[tokio::test]
    async fn test_no_repair_unless_text_starts_with_brace() {
        let provider = RepairProvider::new(Ok(r#"{"title": "Soup"}"#));
        let raw = r#"The recipe is {"title": "Soup", "ingredients": ["#;

        let fields = parser(&provider).parse(raw, ParseTarget::RecipeFields).await;

        assert!(fields.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_repair_failure_gives_empty_map() {
        let provider = RepairProvider::new(Err("model offline"));
        let fields = parser(&provider)
            .parse(r#"{"cookTime": "20""#, ParseTarget::TimeDifficulty)
            .await;

        assert!(fields.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_object_without_key_fields_is_rejected() {
        let provider = RepairProvider::new(Ok(r#"{"servings": 4}"#));
        let fields = parser(&provider)
            .parse(r#"{"servings": 4}"#, ParseTarget::RecipeFields)
            .await;

        assert!(fields.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_targets_have_their_own_key_fields() {
        let provider = RepairProvider::new(Ok("{}"));
        let raw = r#"{"cookTime": "45", "difficulty": "Easy"}"#;

        assert!(parser(&provider)
            .parse(raw, ParseTarget::RecipeFields)
            .await
            .is_empty());
        assert_eq!(
            parser(&provider)
                .parse(raw, ParseTarget::TimeDifficulty)
                .await
                .len(),
            2
        );
    }

    #[test]
    fn test_empty_map_is_never_accepted() {
        assert!(!ParseTarget::Analysis.accepts(&FieldMap::new()));
    }
}
