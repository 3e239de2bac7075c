//! Resolver bound to a path prefix.

use serde_json::Value;

use crate::active::ActiveState;
use crate::engine::{Engine, RESERVED_SCOPES};
use crate::error::MinerResult;
use crate::properties::PropertyBag;
use crate::token::Format;

/// Resolves paths relative to a fixed scope such as `button`.
///
/// Paths already rooted at `theme`, `props` or `active` are left alone.
#[derive(Clone, Debug)]
pub struct Scoped<'e> {
    engine: &'e Engine,
    scope: String,
}

impl<'e> Scoped<'e> {
    /// Bind `engine` to `scope`.
    pub fn new(engine: &'e Engine, scope: impl Into<String>) -> Self {
        Self {
            engine,
            scope: scope.into(),
        }
    }

    /// The scope prefix.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Full path for `key`.
    pub fn qualify(&self, key: &str) -> String {
        let root = key.split('.').next().unwrap_or_default();
        if RESERVED_SCOPES.contains(&root) || self.scope.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.scope, key)
        }
    }

    /// Resolve `key` inside the scope.
    pub fn get(
        &self,
        key: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
        format: &Format,
    ) -> Option<Value> {
        self.engine
            .token(&self.qualify(key), props, precomputed, format)
    }

    /// Run a mixin on `key` inside the scope.
    pub fn mixin(
        &self,
        name: &str,
        args: &[Value],
        key: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> MinerResult<Value> {
        self.engine
            .mixin(name, args, &self.qualify(key), props, precomputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{Dimension, OptionScale};
    use serde_json::json;

    fn engine() -> Engine {
        Engine::builder()
            .theme(json!({
                "button": {
                    "radius": 4,
                    "size": { "s": { "pad": 6 }, "m": { "pad": 8 } }
                },
                "radius": 2
            }))
            .dimension("size", Dimension::new(OptionScale::new(["s", "m"], "m")))
            .mixin("double", |_, _, value, _| {
                Ok(json!(value.as_i64().unwrap_or_default() * 2))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_qualify() {
        let engine = engine();
        let scoped = engine.scoped("button");
        assert_eq!(scoped.qualify("radius"), "button.radius");
        assert_eq!(scoped.qualify("theme.radius"), "theme.radius");
        assert_eq!(scoped.qualify("props.$size"), "props.$size");
        assert_eq!(scoped.qualify("active.size.key"), "active.size.key");
        assert_eq!(scoped.qualify("themed.x"), "button.themed.x");
    }

    #[test]
    fn test_get_and_mixin() {
        let engine = engine();
        let scoped = engine.scoped("button");
        let props = PropertyBag::new().with("$size", "s");

        assert_eq!(scoped.get("radius", &props, None, &Format::Raw), Some(json!(4)));
        assert_eq!(scoped.get("theme.radius", &props, None, &Format::Raw), Some(json!(2)));
        assert_eq!(
            scoped.get("size.active.pad", &props, None, &Format::unit("px")),
            Some(json!("6px"))
        );
        assert_eq!(
            scoped.mixin("double", &[], "size.active.pad", &props, None).unwrap(),
            json!(12)
        );
    }
}
