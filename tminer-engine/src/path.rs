//! Dotted-path lookup into nested theme data.

use serde_json::Value;

/// Resolve a dot-separated `path` inside `root`.
///
/// Returns `None` for a missing segment or an explicit `null`. Zero and `false`
/// are real values. A non-container root never resolves.
///
/// ```rust
/// use serde_json::json;
/// use tminer_engine::path::resolve;
///
/// let theme = json!({ "spacing": { "sp+0": 0 } });
/// assert_eq!(resolve(&theme, "spacing.sp+0"), Some(&json!(0)));
/// assert_eq!(resolve(&theme, "spacing.sp+9"), None);
/// ```
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_segments(root, path.split('.'))
}

/// Same as [`resolve`] for a pre-split path.
pub fn resolve_segments<'a, 'p>(
    root: &'a Value,
    segments: impl IntoIterator<Item = &'p str>,
) -> Option<&'a Value> {
    if !matches!(root, Value::Object(_) | Value::Array(_)) {
        return None;
    }

    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme() -> Value {
        json!({
            "palette": { "primary": { "sh+0": "#255BC7" } },
            "spacing": { "sp+0": 0, "sp+1": 8 },
            "flags": { "rounded": false, "missing": null },
            "depth": { "de+1": [{ "radius": 4 }] }
        })
    }

    #[test]
    fn test_resolves_nested_value() {
        assert_eq!(resolve(&theme(), "palette.primary.sh+0"), Some(&json!("#255BC7")));
    }

    #[test]
    fn test_zero_and_false_are_values() {
        let theme = theme();
        assert_eq!(resolve(&theme, "spacing.sp+0"), Some(&json!(0)));
        assert_eq!(resolve(&theme, "flags.rounded"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_segments_are_absent() {
        let theme = theme();
        assert_eq!(resolve(&theme, "palette.secondary.sh+0"), None);
        assert_eq!(resolve(&theme, "flags.missing"), None);
        assert_eq!(resolve(&theme, "flags.missing.deeper"), None);
        assert_eq!(resolve(&theme, "spacing.sp+1.deeper"), None);
        assert_eq!(resolve(&theme, ""), None);
    }

    #[test]
    fn test_array_index_segments() {
        assert_eq!(resolve(&theme(), "depth.de+1.0.radius"), Some(&json!(4)));
        assert_eq!(resolve(&theme(), "depth.de+1.x"), None);
    }

    #[test]
    fn test_non_container_root() {
        assert_eq!(resolve(&json!("palette"), "palette"), None);
        assert_eq!(resolve(&json!(3), "a"), None);
    }
}
