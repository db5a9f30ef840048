use crate::model::FieldMap;
use serde_json::Value;

/// Parses `text` as a JSON object. Arrays and scalars are not field maps.
pub fn parse_object(text: &str) -> Option<FieldMap> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

/// Returns the first `{ ... }` span whose braces balance.
///
/// Braces inside JSON string literals are ignored so a `"}"` in an ingredient
/// does not end the object early. Returns `None` when the text runs out before
/// the depth gets back to zero.
pub fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
