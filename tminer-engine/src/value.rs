//! Loose value semantics shared by the resolver and the condition evaluator.
//!
//! Theme leaves and property values are plain [`serde_json::Value`]s. The helpers
//! here decide what counts as "set", how a resolved value compares against a
//! literal taken out of a condition string, and how numbers are rendered.

use std::cmp::Ordering;

use serde_json::Value;

/// Whether a value counts as set.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Containers are
/// always truthy, even when empty.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Same as [`truthy`] but treating absence as falsy.
pub fn is_set(value: Option<&Value>) -> bool {
    value.map_or(false, truthy)
}

/// Numeric view of a value. Numeric strings count.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        Value::Bool(false) => Some(0.0),
        _ => None,
    }
}

/// Build a JSON number, keeping integral values integral so they print as `16`, not `16.0`.
pub fn number(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Render a scalar for string concatenation. Containers have no text form.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Option label carried by a direct dimension property (`$size: "large"`).
///
/// Falsy values carry no label.
pub fn option_label(value: &Value) -> Option<String> {
    if !truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose equality between a resolved value and a literal.
///
/// Absent values only equal `null`/`undefined`.
pub fn loose_eq(value: Option<&Value>, literal: &str) -> bool {
    let literal = literal.trim();
    match value {
        None | Some(Value::Null) => matches!(literal, "null" | "undefined"),
        Some(Value::String(s)) => s == literal,
        Some(Value::Bool(b)) => match literal {
            "true" | "1" => *b,
            "false" | "0" | "" => !*b,
            _ => false,
        },
        Some(Value::Number(n)) => match (n.as_f64(), literal.parse::<f64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => false,
        },
        Some(other) => other.to_string() == literal,
    }
}

/// Loose ordering between a resolved value and a literal.
///
/// Numbers compare numerically, strings lexically. Anything else is unordered.
pub fn loose_cmp(value: Option<&Value>, literal: &str) -> Option<Ordering> {
    let literal = literal.trim();
    let value = value?;
    if let (Some(a), Ok(b)) = (as_number(value), literal.parse::<f64>()) {
        return a.partial_cmp(&b);
    }
    match value {
        Value::String(s) => Some(s.as_str().cmp(literal)),
        _ => None,
    }
}

/// Membership test used by `in`/`not in`.
///
/// Returns `None` when the value is not list-like or is empty, which makes
/// both operators fail.
pub fn contains(value: Option<&Value>, literal: &str) -> Option<bool> {
    let literal = literal.trim();
    match value? {
        Value::Array(items) if !items.is_empty() => {
            Some(items.iter().any(|item| loose_eq(Some(item), literal)))
        }
        Value::String(s) if !s.is_empty() => Some(s.contains(literal)),
        _ => None,
    }
}

/// Whether a value looks like a CSS color.
pub fn is_color(value: Option<&Value>) -> bool {
    let Some(Value::String(s)) = value else {
        return false;
    };
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = s.to_ascii_lowercase();
    ["rgb(", "rgba(", "hsl(", "hsla("]
        .iter()
        .any(|prefix| lower.starts_with(prefix) && lower.ends_with(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
        assert!(truthy(&json!(-1)));
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label(&json!("sc+1")), Some("sc+1".to_string()));
        assert_eq!(option_label(&json!(2)), Some("2".to_string()));
        assert_eq!(option_label(&json!(0)), None);
        assert_eq!(option_label(&json!("")), None);
        assert_eq!(option_label(&json!(true)), None);
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(Some(&json!(true)), "true"));
        assert!(!loose_eq(Some(&json!(false)), "true"));
        assert!(loose_eq(Some(&json!(16)), "16"));
        assert!(loose_eq(Some(&json!(16)), "16.0"));
        assert!(loose_eq(Some(&json!("normal")), "normal"));
        assert!(!loose_eq(None, "normal"));
        assert!(loose_eq(None, "undefined"));
    }

    #[test]
    fn test_loose_cmp() {
        assert_eq!(loose_cmp(Some(&json!(8)), "16"), Some(Ordering::Less));
        assert_eq!(loose_cmp(Some(&json!("24")), "16"), Some(Ordering::Greater));
        assert_eq!(loose_cmp(None, "16"), None);
        assert_eq!(loose_cmp(Some(&json!({"a": 1})), "16"), None);
    }

    #[test]
    fn test_contains() {
        assert_eq!(contains(Some(&json!(["left", "top"])), "left"), Some(true));
        assert_eq!(contains(Some(&json!(["left"])), "right"), Some(false));
        assert_eq!(contains(Some(&json!([])), "left"), None);
        assert_eq!(contains(Some(&json!(3)), "3"), None);
    }

    #[test]
    fn test_number_keeps_integers() {
        assert_eq!(number(16.0).to_string(), "16");
        assert_eq!(number(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_is_color() {
        assert!(is_color(Some(&json!("#255BC7"))));
        assert!(is_color(Some(&json!("#fff"))));
        assert!(is_color(Some(&json!("rgb(0, 0, 0)"))));
        assert!(!is_color(Some(&json!("#zzzzzz"))));
        assert!(!is_color(Some(&json!(12))));
        assert!(!is_color(None));
    }
}
