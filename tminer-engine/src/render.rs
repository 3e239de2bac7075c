//! # Render Handle
//!
//! [`Engine::render`](crate::engine::Engine::render) prepares everything one
//! component render needs: the projected property set, the active state, the
//! current theme identity and resolution helpers bound to those. Adapters for a
//! concrete UI framework wrap this handle.
//!
//! ```rust
//! use serde_json::json;
//! use tminer_engine::dimension::{Dimension, OptionScale};
//! use tminer_engine::engine::Engine;
//! use tminer_engine::properties::PropertyBag;
//! use tminer_engine::render::RenderOptions;
//! use tminer_engine::token::Format;
//!
//! let engine = Engine::builder()
//!     .theme(json!({ "button": { "size": { "s": { "pad": 6 }, "m": { "pad": 8 } } } }))
//!     .dimension("size", Dimension::new(OptionScale::new(["s", "m"], "m")))
//!     .build()
//!     .unwrap();
//!
//! let props = PropertyBag::new().with("$s", true).with("onClick", "handler");
//! let ui = engine.render(&props, &[], RenderOptions::new().cache().scope("button"));
//!
//! assert_eq!(ui.get("size.active.pad", &Format::unit("px")), Some(json!("6px")));
//! assert!(!ui.props().has("onClick"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::active::ActiveState;
use crate::calc;
use crate::condition::{Cond, Condition};
use crate::engine::Engine;
use crate::error::{MinerError, MinerResult};
use crate::properties::{Projection, PropertyBag};
use crate::token::Format;
use crate::value;

/// Extra properties derived from the computed active state.
pub type OverwriteFn = Arc<dyn Fn(&ActiveState) -> PropertyBag + Send + Sync>;

/// Per-render switches.
#[derive(Clone, Default)]
pub struct RenderOptions {
    /// Thread the computed active state through every resolution.
    pub cache: bool,
    /// Prefix for paths not rooted at `theme`, `props` or `active`.
    pub scope: Option<String>,
    /// Properties merged over the caller's after the first active-state pass.
    pub overwrite: Option<OverwriteFn>,
}

impl RenderOptions {
    /// Default options: no cache, no scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable active-state caching.
    pub fn cache(mut self) -> Self {
        self.cache = true;
        self
    }

    /// Resolve paths inside `scope`.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Derive extra properties from the active state.
    pub fn overwrite<F>(mut self, f: F) -> Self
    where
        F: Fn(&ActiveState) -> PropertyBag + Send + Sync + 'static,
    {
        self.overwrite = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("cache", &self.cache)
            .field("scope", &self.scope)
            .field("overwrite", &self.overwrite.is_some())
            .finish()
    }
}

/// Everything one render needs, bound to an engine.
#[derive(Clone, Debug)]
pub struct Rendered<'e> {
    engine: &'e Engine,
    props: PropertyBag,
    projection: Projection,
    active: ActiveState,
    theme_props: PropertyBag,
    cache: bool,
    scope: Option<String>,
}

impl<'e> Rendered<'e> {
    pub(crate) fn new(
        engine: &'e Engine,
        props: &PropertyBag,
        local_keys: &[String],
        options: RenderOptions,
    ) -> Self {
        let mut active = engine.active(props);

        let merged = match &options.overwrite {
            Some(overwrite) => {
                let mut merged = props.clone();
                merged.merge(&overwrite(&active));
                active = engine.active(&merged);
                Some(merged)
            }
            None => None,
        };
        let projection = engine.properties(merged.as_ref().unwrap_or(props), local_keys);

        let mut theme_props = PropertyBag::new();
        if let (Ok(palette_key), Some(theme_key)) =
            (engine.options().palette_key(), engine.theme_key())
        {
            theme_props.set(engine.options().key(palette_key), theme_key);
        }

        if options.cache {
            log::debug!("Caching active state for {} dimensions", active.len());
        }

        Self {
            engine,
            props: projection.all.clone(),
            projection,
            active,
            theme_props,
            cache: options.cache,
            scope: options.scope,
        }
    }

    /// The engine this handle resolves through.
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// Projected property set used for resolution.
    pub fn props(&self) -> &PropertyBag {
        &self.props
    }

    /// The projection split by origin.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Active state computed for this render.
    pub fn active(&self) -> &ActiveState {
        &self.active
    }

    /// The effective theme.
    pub fn theme(&self) -> &'e Value {
        self.engine.theme()
    }

    /// Current theme name.
    pub fn theme_key(&self) -> Option<&'e str> {
        self.engine.theme_key()
    }

    /// Current theme mode.
    pub fn theme_mode(&self) -> Option<&'e str> {
        self.engine.theme_mode()
    }

    /// `{ <prefixed palette key>: <theme name> }`, empty without theming.
    pub fn theme_props(&self) -> &PropertyBag {
        &self.theme_props
    }

    fn precomputed(&self) -> Option<&ActiveState> {
        self.cache.then_some(&self.active)
    }

    fn qualify(&self, path: &str) -> String {
        match &self.scope {
            Some(scope) => self.engine.scoped(scope.as_str()).qualify(path),
            None => path.to_string(),
        }
    }

    /// Resolve a token path against the projected properties.
    pub fn get(&self, path: &str, format: &Format) -> Option<Value> {
        self.engine
            .token(&self.qualify(path), &self.props, self.precomputed(), format)
    }

    /// Resolve with `extra` merged over the projected properties.
    ///
    /// The active state is recomputed since `extra` may change it.
    pub fn get_with(&self, path: &str, extra: &PropertyBag, format: &Format) -> Option<Value> {
        let mut props = self.props.clone();
        props.merge(extra);
        self.engine.token(&self.qualify(path), &props, None, format)
    }

    /// Evaluate a condition.
    pub fn evaluate(&self, condition: &Condition) -> bool {
        self.engine
            .evaluate(condition, &self.props, self.precomputed())
    }

    /// Evaluate an if/then/else selection.
    pub fn cond(&self, cond: &Cond) -> Option<Value> {
        self.engine.cond(cond, &self.props, self.precomputed())
    }

    /// Run a mixin on a token path.
    pub fn mixin(&self, name: &str, args: &[Value], path: &str) -> MinerResult<Value> {
        self.engine.mixin(
            name,
            args,
            &self.qualify(path),
            &self.props,
            self.precomputed(),
        )
    }

    /// Evaluate a calculation and shape the number. Token paths are scoped.
    pub fn calc(&self, text: &str, format: &Format) -> Option<Value> {
        let expr = match calc::parse(text) {
            Ok(expr) => expr.map_tokens(&|path| self.qualify(path)),
            Err(e) => {
                log::warn!("Invalid calculation '{}': {}", text, e);
                return None;
            }
        };
        let result = self
            .engine
            .calc(&expr, &self.props, self.precomputed())
            .map(value::number);
        format.apply(result)
    }

    /// Step the active key of a dimension, or its variant with
    /// `"<dimension>.<anything>"` (`"palette.shade"`).
    pub fn closest(&self, dimension: &str, delta: i64) -> MinerResult<String> {
        let (name, variant) = match dimension.split_once('.') {
            Some((name, _)) => (name, true),
            None => (dimension, false),
        };
        let selection = self
            .active
            .get(name)
            .ok_or_else(|| MinerError::unknown_dimension(name))?;
        let current = if variant {
            selection
                .variant
                .as_deref()
                .ok_or_else(|| MinerError::invalid_dimension(name, "no variants declared"))?
        } else {
            selection.key.as_str()
        };
        self.engine.closest(name, current, delta, variant)
    }
}
