//! Pull a JSON object out of free-form model output.
//!
//! Models asked for "JSON only" still wrap answers in prose or code fences,
//! so the extractor slices from the first `{` to the last `}` before parsing.
//! Braces inside the surrounding prose widen that slice and make the parse
//! fail; such output falls back like any other malformed answer.

use serde_json::{Map, Value};

/// A JSON object as produced by a model or supplied as fallback.
pub type JsonObject = Map<String, Value>;

/// Result of extracting an object from raw model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub value: JsonObject,
    pub used_fallback: bool,
}

/// Extract the JSON object embedded in `raw`, or return a copy of `fallback`.
pub fn extract_json_object(raw: &str, fallback: &JsonObject) -> Extraction {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback_extraction(fallback);
    }

    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(value)) => Extraction {
            value,
            used_fallback: false,
        },
        _ => fallback_extraction(fallback),
    }
}

fn fallback_extraction(fallback: &JsonObject) -> Extraction {
    Extraction {
        value: fallback.clone(),
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        }
    }

    fn tags_fallback() -> JsonObject {
        object(json!({ "tags": [] }))
    }

    #[test]
    fn extracts_object_wrapped_in_prose() {
        let result = extract_json_object(
            "Here is the answer: {\"tags\":[\"a\",\"b\"]} enjoy!",
            &tags_fallback(),
        );
        assert!(!result.used_fallback);
        assert_eq!(result.value, object(json!({ "tags": ["a", "b"] })));
    }

    #[test]
    fn extracts_object_inside_code_fence() {
        let raw = "```json\n{\"sentimentScore\": 0.4, \"label\": \"Positive\"}\n```";
        let result = extract_json_object(raw, &JsonObject::new());
        assert!(!result.used_fallback);
        assert_eq!(result.value.get("label"), Some(&json!("Positive")));
    }

    #[test]
    fn refusal_text_falls_back() {
        let result = extract_json_object("I cannot comply", &tags_fallback());
        assert!(result.used_fallback);
        assert_eq!(result.value, tags_fallback());
    }

    #[test]
    fn empty_and_whitespace_fall_back() {
        assert!(extract_json_object("", &tags_fallback()).used_fallback);
        assert!(extract_json_object("  \n\t ", &tags_fallback()).used_fallback);
    }

    #[test]
    fn non_object_json_falls_back() {
        assert!(extract_json_object("[1, 2, 3]", &tags_fallback()).used_fallback);
        assert!(extract_json_object("42", &tags_fallback()).used_fallback);
        assert!(extract_json_object("\"text\"", &tags_fallback()).used_fallback);
    }

    #[test]
    fn braces_in_surrounding_prose_break_extraction() {
        let raw = "Use {curly} braces: {\"tags\":[\"x\"]}";
        assert!(extract_json_object(raw, &tags_fallback()).used_fallback);
    }

    #[test]
    fn reversed_braces_parse_whole_text() {
        let result = extract_json_object("} nothing here {", &tags_fallback());
        assert!(result.used_fallback);
    }
}
