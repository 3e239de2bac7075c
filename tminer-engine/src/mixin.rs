//! # Mixin Registry
//!
//! Mixins are named extension functions registered at configuration time. They
//! receive the engine, the property bag, the resolved base value and any extra
//! arguments, and return a value verbatim to the caller.
//!
//! ```rust
//! use serde_json::{json, Value};
//! use tminer_engine::mixin::MixinRegistry;
//!
//! let mut mixins = MixinRegistry::new();
//! mixins.register("multiply", |_engine, _props, value, args| {
//!     let factor = args.first().and_then(Value::as_f64).unwrap_or(1.0);
//!     Ok(json!(value.as_f64().unwrap_or(0.0) * factor))
//! });
//! assert!(mixins.contains("multiply"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::error::MinerResult;
use crate::properties::PropertyBag;

/// Signature every mixin conforms to.
pub type MixinFn =
    Arc<dyn Fn(&Engine, &PropertyBag, Value, &[Value]) -> MinerResult<Value> + Send + Sync>;

/// Name-keyed mixin functions.
#[derive(Clone, Default)]
pub struct MixinRegistry {
    mixins: HashMap<String, MixinFn>,
}

impl MixinRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mixin, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, mixin: F)
    where
        F: Fn(&Engine, &PropertyBag, Value, &[Value]) -> MinerResult<Value> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(mixin));
    }

    /// Register an already shared mixin.
    pub fn insert(&mut self, name: impl Into<String>, mixin: MixinFn) {
        self.mixins.insert(name.into(), mixin);
    }

    /// Look up a mixin.
    pub fn get(&self, name: &str) -> Option<&MixinFn> {
        self.mixins.get(name)
    }

    /// Check if a mixin is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.mixins.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mixins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered mixins.
    pub fn len(&self) -> usize {
        self.mixins.len()
    }

    /// Whether no mixin is registered.
    pub fn is_empty(&self) -> bool {
        self.mixins.is_empty()
    }

    /// Merge another registry in. Entries from `other` win.
    pub fn extend(&mut self, other: MixinRegistry) {
        self.mixins.extend(other.mixins);
    }
}

impl fmt::Debug for MixinRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixinRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_replace() {
        let mut registry = MixinRegistry::new();
        registry.register("a", |_, _, _, _| Ok(json!(1)));
        registry.register("b", |_, _, v, _| Ok(v));
        registry.register("a", |_, _, _, _| Ok(json!(2)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_extend() {
        let mut first = MixinRegistry::new();
        first.register("a", |_, _, _, _| Ok(json!(1)));
        let mut second = MixinRegistry::new();
        second.register("b", |_, _, _, _| Ok(json!(2)));
        first.extend(second);
        assert!(first.contains("a") && first.contains("b"));
        assert!(!first.contains("c"));
    }
}
