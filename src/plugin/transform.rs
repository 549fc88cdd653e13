//! Built-in value transformers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Transformer;

/// Text shown for a value in a plain cell or copied to the clipboard.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Interpret pasted text for a column without a transformer, keeping the
/// type of the value it replaces where the text allows it.
pub fn coerce_text(text: &str, existing: Option<&Value>) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    match existing {
        Some(Value::Number(_)) => {
            if let Ok(n) = text.trim().parse::<i64>() {
                return Value::from(n);
            }
            if let Some(n) = text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                return Value::Number(n);
            }
        }
        Some(Value::Bool(_)) => {
            if let Some(b) = parse_bool(text) {
                return Value::Bool(b);
            }
        }
        _ => {}
    }
    Value::String(text.to_string())
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => parse_bool(s).unwrap_or(true),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Stores and displays values as booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTransformer;

impl Transformer for BooleanTransformer {
    fn read(&self, raw: &Value) -> Value {
        Value::Bool(truthy(raw))
    }

    fn write(&self, value: &Value) -> Value {
        Value::Bool(truthy(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOptions {
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_not_exist_option: bool,
}

/// Maps between stored option lists and the options a user typed or pasted.
///
/// Values read as an array of option strings. Writes accept an array or a
/// comma-separated string. Unless `allow_not_exist_option` is set, entries
/// outside `options` are dropped in both directions.
#[derive(Debug, Clone, Default)]
pub struct SelectionTransformer {
    options: SelectionOptions,
}

impl SelectionTransformer {
    pub fn new(options: SelectionOptions) -> Self {
        Self { options }
    }

    fn keep(&self, item: &str) -> bool {
        self.options.allow_not_exist_option || self.options.options.iter().any(|o| o == item)
    }

    fn to_options(&self, value: &Value) -> Value {
        let items: Vec<String> = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().map(display_text).collect(),
            Value::String(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
            other => vec![display_text(other)],
        };
        Value::Array(
            items
                .into_iter()
                .filter(|item| !item.is_empty() && self.keep(item))
                .map(Value::String)
                .collect(),
        )
    }
}

impl Transformer for SelectionTransformer {
    fn read(&self, raw: &Value) -> Value {
        self.to_options(raw)
    }

    fn write(&self, value: &Value) -> Value {
        self.to_options(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(true), true ; "bool")]
    #[test_case(json!(0), false ; "zero")]
    #[test_case(json!(2.5), true ; "number")]
    #[test_case(json!("no"), false ; "no string")]
    #[test_case(json!("TRUE"), true ; "upper true")]
    #[test_case(json!(null), false ; "null")]
    fn boolean_read(raw: Value, expected: bool) {
        assert_eq!(BooleanTransformer.read(&raw), Value::Bool(expected));
    }

    #[test]
    fn selection_filters_unknown_options() {
        let t = SelectionTransformer::new(SelectionOptions {
            options: vec!["jan".into(), "feb".into()],
            allow_not_exist_option: false,
        });
        assert_eq!(t.write(&json!("jan, mar ,feb")), json!(["jan", "feb"]));
        assert_eq!(t.read(&json!("feb")), json!(["feb"]));
        assert_eq!(t.read(&json!(null)), json!([]));
    }

    #[test]
    fn selection_can_keep_unknown_options() {
        let t = SelectionTransformer::new(SelectionOptions {
            options: vec![],
            allow_not_exist_option: true,
        });
        assert_eq!(t.write(&json!(["x", "y"])), json!(["x", "y"]));
    }

    #[test_case("12", Some(json!(1)), json!(12) ; "integer keeps number")]
    #[test_case("1.5", Some(json!(1)), json!(1.5) ; "float keeps number")]
    #[test_case("abc", Some(json!(1)), json!("abc") ; "unparseable becomes text")]
    #[test_case("yes", Some(json!(false)), json!(true) ; "bool keeps bool")]
    #[test_case("007", Some(json!("x")), json!("007") ; "text stays text")]
    #[test_case("", None, json!(null) ; "empty is null")]
    fn coerce(text: &str, existing: Option<Value>, expected: Value) {
        assert_eq!(coerce_text(text, existing.as_ref()), expected);
    }

    #[test]
    fn display_joins_arrays() {
        assert_eq!(display_text(&json!(["a", 1, true])), "a, 1, true");
        assert_eq!(display_text(&json!(null)), "");
    }
}
