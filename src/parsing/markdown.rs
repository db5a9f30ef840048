use crate::model::FieldMap;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+?)\s*$").expect("Invalid title regex"));

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)## Description\s*\n(.+?)(?:\n## |$)").expect("Invalid description regex")
});

static INGREDIENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)## Ingredients\s*\n(.+?)(?:\n## |$)").expect("Invalid ingredients regex")
});

static INSTRUCTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)## Instructions\s*\n(.+?)(?:\n## |$)").expect("Invalid instructions regex")
});

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Image\s*\n(.+?)(?:\n|$)").expect("Invalid image regex"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*-\s+(.+?)\s*$").expect("Invalid bullet regex"));

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s*(.+?)\s*$").expect("Invalid step regex"));

/// Reads the fixed-heading markdown layout requested by the markdown prompt.
///
/// Sections that are missing are left out of the map. Text outside the known
/// headings is ignored.
pub fn parse_markdown(text: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(title) = capture(&TITLE, text) {
        fields.insert("title".to_string(), Value::String(title));
    }

    if let Some(description) = capture(&DESCRIPTION, text) {
        fields.insert("description".to_string(), Value::String(description));
    }

    if let Some(ingredients) = capture(&INGREDIENTS, text).and_then(|s| list_items(&BULLET, &s)) {
        fields.insert("ingredients".to_string(), ingredients);
    }

    if let Some(instructions) =
        capture(&INSTRUCTIONS, text).and_then(|s| list_items(&NUMBERED, &s))
    {
        fields.insert("instructions".to_string(), instructions);
    }

    if let Some(image) = capture(&IMAGE, text) {
        fields.insert("imageUrl".to_string(), Value::String(image));
    }

    fields
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    let captured = regex.captures(text)?.get(1)?.as_str().trim();
    (!captured.is_empty()).then(|| captured.to_string())
}

fn list_items(regex: &Regex, section: &str) -> Option<Value> {
    let items: Vec<Value> = regex
        .captures_iter(section)
        .filter_map(|caps| caps.get(1))
        .map(|item| Value::String(item.as_str().to_string()))
        .collect();

    (!items.is_empty()).then_some(Value::Array(items))
}
