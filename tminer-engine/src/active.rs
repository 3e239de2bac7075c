//! # Active State
//!
//! The active state is the resolved `{key, variant}` selection of every declared
//! dimension for one property bag. Precedence per dimension, lowest first:
//!
//! 1. the declared default;
//! 2. option flags (`$primary: true`), the last declared truthy flag winning;
//! 3. the direct dimension property (`$palette: "black"`).
//!
//! Variants follow the same order using the variant scale and the variant key
//! property (`$shade: "sh+1"`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineOptions;
use crate::dimension::{Dimension, OptionScale};
use crate::properties::PropertyBag;
use crate::value::option_label;

/// Selection of one dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected option label.
    pub key: String,
    /// Selected variant label, for dimensions with variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Selection {
    /// Theme path segments substituted for the active marker.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.variant.as_deref())
    }
}

/// Active selections for all declared dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveState {
    selections: IndexMap<String, Selection>,
}

impl ActiveState {
    /// Selection for a dimension.
    pub fn get(&self, dimension: &str) -> Option<&Selection> {
        self.selections.get(dimension)
    }

    /// Selected key of a dimension.
    pub fn key(&self, dimension: &str) -> Option<&str> {
        self.get(dimension).map(|s| s.key.as_str())
    }

    /// Selected variant of a dimension.
    pub fn variant(&self, dimension: &str) -> Option<&str> {
        self.get(dimension).and_then(|s| s.variant.as_deref())
    }

    /// Iterate selections in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Selection)> {
        self.selections.iter()
    }

    /// Number of dimensions covered.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether no dimension is covered.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// JSON view, `{ "<dimension>": { "key": .., "variant": .. } }`.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.selections).unwrap_or(Value::Null)
    }
}

fn select(
    scale: &OptionScale,
    direct_key: &str,
    use_flags: bool,
    options: &EngineOptions,
    props: &PropertyBag,
) -> String {
    let mut selected = None;

    if use_flags {
        for option in &scale.options {
            if props.is_set(&options.key(option)) {
                selected = Some(option.clone());
            }
        }
    }

    if let Some(label) = props.get(&options.key(direct_key)).and_then(option_label) {
        selected = Some(label);
    }

    selected.unwrap_or_else(|| scale.default.clone())
}

/// Compute the active state of every dimension for `props`.
///
/// Always total: every declared dimension gets an entry.
pub fn compute_active(
    dimensions: &IndexMap<String, Dimension>,
    options: &EngineOptions,
    props: &PropertyBag,
) -> ActiveState {
    let selections = dimensions
        .iter()
        .map(|(name, dimension)| {
            let key = select(&dimension.scale, name, options.use_option_flags, options, props);
            let variant = dimension.variants.as_ref().map(|variants| {
                select(
                    &variants.scale,
                    &variants.key,
                    options.use_variant_flags,
                    options,
                    props,
                )
            });
            (name.clone(), Selection { key, variant })
        })
        .collect();

    ActiveState { selections }
}
