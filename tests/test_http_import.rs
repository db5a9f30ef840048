mod common;

use common::{GARLIC_BREAD_JSON, GARLIC_BREAD_PAGE};
use mockito::{Matcher, Server};
use recipe_import::fetchers::RequestFetcher;
use recipe_import::providers::OpenAIProvider;
use recipe_import::{Difficulty, ImportConfig, RecipeImporter};
use serde_json::json;
use std::sync::Arc;

fn completion(content: &str) -> String {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": content}
        }]
    })
    .to_string()
}

/// Full import over HTTP: page fetch and model calls both go to a mock server
#[tokio::test]
async fn test_import_over_http() {
    let mut server = Server::new_async().await;

    let page = server
        .mock("GET", "/recipes/garlic-bread")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(GARLIC_BREAD_PAGE)
        .create_async()
        .await;

    let fields = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Extract basic recipe information".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&format!("```json\n{}\n```\n---END---", GARLIC_BREAD_JSON)))
        .create_async()
        .await;

    let time = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Extract cook time and difficulty".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(r#"{"cookTime": "20", "difficulty": "Easy"}"#))
        .create_async()
        .await;

    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o".to_string(),
    );
    let importer = RecipeImporter::builder()
        .config(ImportConfig::default())
        .provider(Arc::new(provider))
        .renderer(Arc::new(RequestFetcher::new("RecipeBot/1.0")))
        .build()
        .unwrap();

    let url = format!("{}/recipes/garlic-bread", server.url());
    let recipe = importer.import(&url).await;

    assert_eq!(recipe.title, "Garlic Bread");
    assert_eq!(recipe.ingredients.len(), 3);
    assert_eq!(recipe.cook_time, "20");
    assert_eq!(recipe.difficulty, Difficulty::Easy);
    assert_eq!(
        recipe.image_url,
        format!("{}/images/garlic-bread-1200x800.jpg", server.url())
    );
    assert!(!recipe.is_error());

    page.assert_async().await;
    fields.assert_async().await;
    time.assert_async().await;
}

/// A page that answers with an error status is still imported from its body
#[tokio::test]
async fn test_import_from_error_status_page() {
    let mut server = Server::new_async().await;

    let _page = server
        .mock("GET", "/recipes/garlic-bread")
        .with_status(404)
        .with_body(GARLIC_BREAD_PAGE)
        .create_async()
        .await;

    let _model = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(GARLIC_BREAD_JSON))
        .create_async()
        .await;

    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o".to_string(),
    );
    let importer = RecipeImporter::builder()
        .config(ImportConfig::default())
        .provider(Arc::new(provider))
        .renderer(Arc::new(RequestFetcher::new("RecipeBot/1.0")))
        .build()
        .unwrap();

    let recipe = importer
        .import(&format!("{}/recipes/garlic-bread", server.url()))
        .await;

    assert_eq!(recipe.title, "Garlic Bread");
    assert!(!recipe.is_error());
}
