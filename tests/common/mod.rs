#![allow(dead_code)]

use async_trait::async_trait;
use recipe_import::{ImportError, LlmProvider, PageRenderer};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Text that identifies each kind of prompt.
pub const FIELDS_PROMPT: &str = "Extract basic recipe information";
pub const TIME_PROMPT: &str = "Extract cook time and difficulty";
pub const MARKDOWN_PROMPT: &str = "exact markdown format";
pub const REPAIR_PROMPT: &str = "Fix and complete this JSON";
pub const ANALYSIS_PROMPT: &str = "Analyze the following recipe";
pub const DESCRIPTION_PROMPT: &str = "appetizing description";
pub const CHAT_PROMPT: &str = "helpful cooking assistant";

/// Replies to prompts by the first rule whose marker the prompt contains.
/// Unmatched prompts get an empty reply.
#[derive(Default)]
pub struct ScriptedProvider {
    rules: Vec<(String, Result<String, String>)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, marker: &str, reply: &str) -> Self {
        self.rules.push((marker.to_string(), Ok(reply.to_string())));
        self
    }

    pub fn failing_on(mut self, marker: &str, error: &str) -> Self {
        self.rules.push((marker.to_string(), Err(error.to_string())));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls_with(&self, marker: &str) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| prompt.contains(marker))
            .count()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self
            .rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Ok(String::new()));

        reply.map_err(|e| e.into())
    }
}

/// Serves the same HTML for every URL.
pub struct StaticRenderer {
    html: String,
    calls: AtomicUsize,
}

impl StaticRenderer {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    fn renderer_name(&self) -> &str {
        "static"
    }

    async fn render(&self, _url: &str, _timeout: Duration) -> Result<String, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

pub struct FailingRenderer;

#[async_trait]
impl PageRenderer for FailingRenderer {
    fn renderer_name(&self) -> &str {
        "failing"
    }

    async fn render(&self, url: &str, _timeout: Duration) -> Result<String, ImportError> {
        Err(ImportError::RenderError(format!("{} did not load", url)))
    }
}

pub const RECIPE_URL: &str = "https://food.example.com/recipes/garlic-bread";

/// A small recipe page with one content image, a logo and some site chrome.
pub const GARLIC_BREAD_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Garlic Bread</title></head>
<body>
    <header><img src="/static/site-logo.png"> Menu</header>
    <nav>Home Recipes Search</nav>
    <article>
        <h1>Garlic Bread</h1>
        <img src="/images/garlic-bread-1200x800.jpg" alt="Sliced garlic bread">
        <img src="/images/step-1.jpg" alt="Mixing butter">
        <p>Crispy, buttery garlic bread ready in no time.</p>
        <h2>Ingredients</h2>
        <ul>
            <li>1 baguette</li>
            <li>4 tbsp butter</li>
            <li>3 cloves garlic</li>
        </ul>
        <h2>Instructions</h2>
        <ol>
            <li>Mix the butter and garlic.</li>
            <li>Spread on the bread and bake.</li>
        </ol>
    </article>
    <footer>Copyright Garlic Co</footer>
</body>
</html>
"#;

pub const GARLIC_BREAD_JSON: &str = r#"{
  "title": "Garlic Bread",
  "description": "Crispy, buttery garlic bread ready in no time.",
  "ingredients": ["1 baguette", "4 tbsp butter", "3 cloves garlic"],
  "instructions": ["Mix the butter and garlic.", "Spread on the bread and bake."]
}"#;
