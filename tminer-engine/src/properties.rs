//! # Property Bags and Projection
//!
//! A [`PropertyBag`] is the caller's set of instance properties for one render.
//! The engine only ever reads it. [`project`] filters a bag down to the keys that
//! matter for styling so adapters can hand them on cheaply.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::config::EngineOptions;
use crate::dimension::Dimension;

/// Instance properties supplied per resolution call.
///
/// Transient properties (those meant only for styling) conventionally carry the
/// configured prefix, e.g. `$palette` or `$negative`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    values: IndexMap<String, Value>,
    bypass_cache: bool,
}

impl PropertyBag {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON object. Anything else yields an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::new(),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a property value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a property.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Get a property value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if a property exists, whatever its value.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Check if a property exists and is truthy.
    pub fn is_set(&self, key: &str) -> bool {
        crate::value::is_set(self.get(key))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Merge another bag into this one. Properties from `other` win.
    pub fn merge(&mut self, other: &PropertyBag) {
        for (key, value) in other.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Force active-state recomputation even when a precomputed state is supplied.
    pub fn disable_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    /// Whether precomputed active states must be ignored for this bag.
    pub fn cache_disabled(&self) -> bool {
        self.bypass_cache
    }

    /// JSON object view of the bag.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Keep only `keys`, dropping `null` and `false` entries.
    ///
    /// Other falsy values such as `0` or `""` are kept.
    pub fn pick<'k>(&self, keys: impl IntoIterator<Item = &'k String>) -> PropertyBag {
        let mut picked = PropertyBag::new();
        for key in keys {
            match self.get(key) {
                None | Some(Value::Null) | Some(Value::Bool(false)) => {}
                Some(value) => picked.set(key.clone(), value.clone()),
            }
        }
        picked
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            bypass_cache: false,
        }
    }
}

impl From<Value> for PropertyBag {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Style-relevant subset of a property bag, split by origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
    /// Union of the three buckets below.
    pub all: PropertyBag,
    /// Keys listed in [`EngineOptions::properties`].
    pub global: PropertyBag,
    /// Keys declared by the caller for this render.
    pub local: PropertyBag,
    /// Dimension, variant and option-flag keys.
    pub interactive: PropertyBag,
}

/// Every property key that can influence the active state.
pub fn interactive_keys(
    dimensions: &IndexMap<String, Dimension>,
    options: &EngineOptions,
) -> IndexSet<String> {
    let mut keys = IndexSet::new();
    for (name, dimension) in dimensions {
        keys.insert(options.key(name));
        if let Some(variants) = &dimension.variants {
            keys.insert(options.key(&variants.key));
        }
        if options.use_option_flags {
            keys.extend(dimension.scale.options.iter().map(|o| options.key(o)));
            if let Some(variants) = &dimension.variants {
                keys.extend(variants.scale.options.iter().map(|o| options.key(o)));
            }
        }
    }
    keys
}

/// Project `props` onto global, interactive and `local_keys` keys.
pub fn project(
    dimensions: &IndexMap<String, Dimension>,
    options: &EngineOptions,
    props: &PropertyBag,
    local_keys: &[String],
) -> Projection {
    let interactive_keys = interactive_keys(dimensions, options);

    let mut all_keys: IndexSet<String> = options.properties.iter().cloned().collect();
    all_keys.extend(interactive_keys.iter().cloned());
    all_keys.extend(local_keys.iter().cloned());

    Projection {
        all: props.pick(&all_keys),
        global: props.pick(&options.properties),
        local: props.pick(local_keys),
        interactive: props.pick(&interactive_keys),
    }
}
