use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Loosely-typed field mapping produced by the response parser.
pub type FieldMap = serde_json::Map<String, Value>;

/// Cook time placeholder used until a value is known.
pub const PENDING_COOK_TIME: &str = "Pending...";
/// Title used when the model did not provide one.
pub const DEFAULT_TITLE: &str = "Imported Recipe";
pub const TAG_IMPORTED: &str = "imported";
pub const TAG_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
    #[default]
    Undetermined,
}

impl Difficulty {
    /// Parses one of the three exact literals `Easy`, `Medium`, `Advanced`.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value {
            "Easy" => Some(Difficulty::Easy),
            "Medium" => Some(Difficulty::Medium),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    /// Lenient parse for model output: trims and ignores case, anything else is undetermined.
    pub fn from_model(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Undetermined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Advanced => "Advanced",
            Difficulty::Undetermined => "Undetermined",
        }
    }

    pub fn is_determined(&self) -> bool {
        *self != Difficulty::Undetermined
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized record returned by an import.
///
/// `ingredients` and `instructions` are kept as sequences but always serialize
/// as newline-joined text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeExtraction {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "join_lines")]
    pub ingredients: Vec<String>,
    #[serde(serialize_with = "join_lines")]
    pub instructions: Vec<String>,
    pub image_url: String,
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub time_reasoning: String,
    pub difficulty_reasoning: String,
    pub tags: BTreeSet<String>,
}

impl Default for RecipeExtraction {
    fn default() -> Self {
        RecipeExtraction {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            image_url: String::new(),
            cook_time: PENDING_COOK_TIME.to_string(),
            difficulty: Difficulty::Undetermined,
            time_reasoning: String::new(),
            difficulty_reasoning: String::new(),
            tags: BTreeSet::from([TAG_IMPORTED.to_string()]),
        }
    }
}

impl RecipeExtraction {
    /// Record returned when the import could not complete.
    pub fn failed(reason: impl fmt::Display) -> Self {
        let mut recipe = RecipeExtraction {
            description: format!("Error: {}", reason),
            ..Default::default()
        };
        recipe.tags.insert(TAG_ERROR.to_string());
        recipe
    }

    pub fn is_error(&self) -> bool {
        self.tags.contains(TAG_ERROR)
    }

    pub fn is_cook_time_pending(&self) -> bool {
        self.cook_time == PENDING_COOK_TIME
    }

    pub fn ingredients_text(&self) -> String {
        self.ingredients.join("\n")
    }

    pub fn instructions_text(&self) -> String {
        self.instructions.join("\n")
    }
}

fn join_lines<S>(lines: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&lines.join("\n"))
}

/// Reads a scalar field as text. Null and empty strings count as missing.
pub fn text_field(fields: &FieldMap, key: &str) -> Option<String> {
    let text = match fields.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if text.is_empty() || text == "null" {
        None
    } else {
        Some(text)
    }
}

/// Reads a list field. A plain string is split into its non-empty lines.
pub fn list_field(fields: &FieldMap, key: &str) -> Vec<String> {
    let items: Vec<String> = match fields.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s.lines().map(String::from).collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
