//! JSON grammar validation and canonical formatting.

use serde_json::{Number, Value};

/// Largest float every integer below which is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parses JSON text and re-serializes it canonically.
pub trait JsonFormatter: Send + Sync {
    /// Parses `text`, returning a human-readable reason on failure.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when `text` is not valid JSON.
    fn parse(&self, text: &str) -> Result<Value, String>;

    /// Renders `value` in canonical form.
    fn canonical(&self, value: &Value) -> String;
}

/// `serde_json` with insertion-ordered keys and two-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonFormatter;

impl JsonFormatter for SerdeJsonFormatter {
    fn parse(&self, text: &str) -> Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn canonical(&self, value: &Value) -> String {
        let mut value = value.clone();
        integral_floats_to_ints(&mut value);
        // Serializing a `Value` to a string cannot fail.
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }
}

/// Rewrites floats without a fractional part as integers, so `1.0` renders
/// as `1` the way JavaScript prints it.
#[allow(clippy::cast_possible_truncation)]
fn integral_floats_to_ints(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                    *n = Number::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_ints),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_ints),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_uses_two_space_indent_and_keeps_key_order() {
        let f = SerdeJsonFormatter;
        let value = f.parse(r#"{"b":1,"a":[1,2],"c":{}}"#).unwrap();
        assert_eq!(
            f.canonical(&value),
            "{\n  \"b\": 1,\n  \"a\": [\n    1,\n    2\n  ],\n  \"c\": {}\n}"
        );
    }

    #[test]
    fn integral_floats_render_as_integers() {
        let f = SerdeJsonFormatter;
        let value = f.parse(r#"{"a":[1.0,-0.0,2.5,1e2],"b":{"c":3.0}}"#).unwrap();
        assert_eq!(
            f.canonical(&value),
            "{\n  \"a\": [\n    1,\n    0,\n    2.5,\n    100\n  ],\n  \"b\": {\n    \"c\": 3\n  }\n}"
        );
    }

    #[test]
    fn parse_failure_reports_reason() {
        let err = SerdeJsonFormatter.parse(r#"{"a":"#).unwrap_err();
        assert!(err.contains("EOF"), "unexpected message: {err}");
    }
}
