//! Output shaping for resolved tokens.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::value::to_text;

/// Post-processing function applied to a resolved value.
pub type MapFn = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// How a resolved token is handed back.
#[derive(Clone, Default)]
pub enum Format {
    /// The raw resolved value.
    #[default]
    Raw,
    /// The value's text with a unit appended (`16` + `px` -> `"16px"`).
    Unit(String),
    /// The value run through a function, absent values included.
    Map(MapFn),
}

impl Format {
    /// Append `unit` to the resolved value.
    pub fn unit(unit: impl Into<String>) -> Self {
        Self::Unit(unit.into())
    }

    /// Post-process the resolved value with `f`.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Map(Arc::new(f))
    }

    /// Apply this format to a resolved value.
    ///
    /// Units only attach to scalars; absent values and containers pass through.
    pub fn apply(&self, value: Option<Value>) -> Option<Value> {
        match self {
            Format::Raw => value,
            Format::Unit(unit) => value.map(|v| match to_text(&v) {
                Some(text) => Value::String(format!("{text}{unit}")),
                None => v,
            }),
            Format::Map(f) => f(value),
        }
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Raw => write!(f, "Raw"),
            Format::Unit(unit) => f.debug_tuple("Unit").field(unit).finish(),
            Format::Map(_) => write!(f, "Map(..)"),
        }
    }
}

impl From<&str> for Format {
    fn from(unit: &str) -> Self {
        Self::unit(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_suffix() {
        assert_eq!(Format::unit("px").apply(Some(json!(16))), Some(json!("16px")));
        assert_eq!(Format::unit("px").apply(Some(json!(0.5))), Some(json!("0.5px")));
        assert_eq!(Format::unit("px").apply(None), None);
        assert_eq!(
            Format::unit("px").apply(Some(json!({ "a": 1 }))),
            Some(json!({ "a": 1 }))
        );
    }

    #[test]
    fn test_raw_passthrough() {
        assert_eq!(Format::Raw.apply(Some(json!(16))), Some(json!(16)));
    }

    #[test]
    fn test_map() {
        let double = Format::map(|v| v.and_then(|v| v.as_i64()).map(|n| json!(n * 2)));
        assert_eq!(double.apply(Some(json!(8))), Some(json!(16)));
        let fallback = Format::map(|v| v.or(Some(json!("none"))));
        assert_eq!(fallback.apply(None), Some(json!("none")));
    }
}
