//! Lenient field coercion for model output.
//!
//! Models return `"0.7"` for numbers, bare numbers for labels and `null` for
//! things they could not decide. [`FieldReader`] turns whatever came back into
//! the typed envelope fields and remembers whether any default had to be
//! substituted, which callers report as a fallback.

use std::cell::Cell;

use serde_json::Value;

use crate::extract::JsonObject;

pub struct FieldReader<'a> {
    object: &'a JsonObject,
    substituted: Cell<bool>,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a JsonObject) -> Self {
        Self {
            object,
            substituted: Cell::new(false),
        }
    }

    /// Whether any read fell back to its default.
    pub fn substituted(&self) -> bool {
        self.substituted.get()
    }

    fn substitute<T>(&self, default: T) -> T {
        self.substituted.set(true);
        default
    }

    pub fn number(&self, key: &str, default: f64) -> f64 {
        match self.object.get(key) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(value) => value,
                None => self.substitute(default),
            },
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return 0.0;
                }
                match trimmed.parse::<f64>() {
                    Ok(value) if value.is_finite() => value,
                    _ => self.substitute(default),
                }
            }
            Some(Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => self.substitute(default),
        }
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        match self.object.get(key) {
            Some(Value::Null) | None => self.substitute(default.to_string()),
            Some(value) => render(value),
        }
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.object.get(key) {
            Some(Value::Array(items)) => items.iter().map(render).collect(),
            _ => self.substitute(Vec::new()),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
