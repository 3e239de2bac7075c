//! # Engine
//!
//! The [`Engine`] owns the configuration record (theme, dimensions, options and
//! mixins) and exposes every resolution entry point. It is built once through
//! [`EngineBuilder`] and passed explicitly to whoever resolves tokens.
//!
//! Resolution only reads the engine. The two mutations, switching the theme and
//! registering mixins, take `&mut self`.
//!
//! ## Token paths
//!
//! The first path segment picks the root:
//!
//! - `theme.<path>` reads the theme;
//! - `props.<path>` reads the property bag;
//! - `active.<dimension>.key` reads the computed active state;
//! - anything else reads the theme, with `<dimension>.active` replaced by the
//!   dimension's active `<key>[.<variant>]`.
//!
//! ```rust
//! use serde_json::json;
//! use tminer_engine::dimension::{Dimension, OptionScale};
//! use tminer_engine::engine::Engine;
//! use tminer_engine::properties::PropertyBag;
//!
//! let engine = Engine::builder()
//!     .theme(json!({ "scale": { "sc+0": { "height": 32 }, "sc+1": { "height": 40 } } }))
//!     .dimension("scale", Dimension::new(OptionScale::new(["sc+0", "sc+1"], "sc+0")))
//!     .build()
//!     .unwrap();
//!
//! let props = PropertyBag::new().with("$scale", "sc+1");
//! assert_eq!(engine.resolve("scale.active.height", &props, None), Some(json!(40)));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::active::{compute_active, ActiveState};
use crate::calc::{self, Expr};
use crate::condition::{Cond, Condition};
use crate::config::{EngineConfig, EngineOptions};
use crate::dimension::Dimension;
use crate::error::{MinerError, MinerResult};
use crate::mixin::MixinRegistry;
use crate::path;
use crate::properties::{self, Projection, PropertyBag};
use crate::render::{RenderOptions, Rendered};
use crate::scoped::Scoped;
use crate::token::Format;

/// Path roots that never name a dimension.
pub const RESERVED_SCOPES: [&str; 3] = ["theme", "props", "active"];

/// Derives the effective theme from the engine and the newly selected theme name.
pub type ThemeHook = Arc<dyn Fn(&Engine, &str) -> Value + Send + Sync>;

/// Configured design-token engine.
#[derive(Clone)]
pub struct Engine {
    base_theme: Value,
    theme: Value,
    dimensions: IndexMap<String, Dimension>,
    options: EngineOptions,
    mixins: MixinRegistry,
    theme_hook: Option<ThemeHook>,
    theme_key: Option<String>,
}

impl Engine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Build an engine from a loaded configuration, without mixins.
    pub fn new(config: EngineConfig) -> MinerResult<Self> {
        EngineBuilder::new().config(config).build()
    }

    /// The effective theme.
    pub fn theme(&self) -> &Value {
        &self.theme
    }

    /// The theme as configured, before any theme hook ran.
    pub fn base_theme(&self) -> &Value {
        &self.base_theme
    }

    /// Declared dimensions, in declaration order.
    pub fn dimensions(&self) -> &IndexMap<String, Dimension> {
        &self.dimensions
    }

    /// Look up one dimension.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    /// Engine switches.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Registered mixins.
    pub fn mixins(&self) -> &MixinRegistry {
        &self.mixins
    }

    /// Register a mixin after construction.
    pub fn register_mixin<F>(&mut self, name: impl Into<String>, mixin: F)
    where
        F: Fn(&Engine, &PropertyBag, Value, &[Value]) -> MinerResult<Value> + Send + Sync + 'static,
    {
        self.mixins.register(name, mixin);
    }

    // -- theming --

    /// Name of the current theme, if one was selected.
    pub fn theme_key(&self) -> Option<&str> {
        self.theme_key.as_deref()
    }

    /// Mode label (`light`, `dark`, ...) of the current theme.
    pub fn theme_mode(&self) -> Option<&str> {
        let key = self.theme_key.as_deref()?;
        self.options
            .theming
            .as_ref()?
            .themes
            .get(key)?
            .mode
            .as_deref()
    }

    /// Theme names known to the engine: declared themes first, then any other
    /// entry under the palette key.
    pub fn available_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .options
            .theming
            .as_ref()
            .map(|t| t.themes.keys().cloned().collect())
            .unwrap_or_default();

        if let Ok(palette_key) = self.options.palette_key() {
            if let Some(Value::Object(palette)) = self.base_theme.get(palette_key) {
                for name in palette.keys() {
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
            }
        }
        names
    }

    /// Palette entry of theme `name`, or of the current theme when `None`.
    ///
    /// Fails when no palette key is configured.
    pub fn get_theme(&self, name: Option<&str>) -> MinerResult<Option<&Value>> {
        let palette_key = self.options.palette_key()?;
        let Some(name) = name.or(self.theme_key.as_deref()) else {
            return Ok(None);
        };
        Ok(self
            .base_theme
            .get(palette_key)
            .and_then(|palette| palette.get(name))
            .filter(|v| !v.is_null()))
    }

    /// Whether `name` has a palette entry.
    pub fn check_theme(&self, name: &str) -> MinerResult<bool> {
        Ok(self.get_theme(Some(name))?.is_some())
    }

    /// Switch the current theme.
    ///
    /// The theme hook, when present, regenerates the effective theme from the base
    /// theme. A failed switch leaves the engine untouched.
    pub fn set_theme(&mut self, name: &str) -> MinerResult<()> {
        let declared = self
            .options
            .theming
            .as_ref()
            .map_or(false, |t| t.themes.contains_key(name));
        if !declared && !self.check_theme(name)? {
            return Err(MinerError::unknown_theme(name));
        }

        let previous = self.theme_key.replace(name.to_string());
        self.theme = match self.theme_hook.clone() {
            Some(hook) => hook(self, name),
            None => self.base_theme.clone(),
        };
        if !self.theme.is_object() {
            log::warn!("Theme hook returned a non-object theme for '{}'", name);
        }

        log::debug!(
            "Switched theme {} -> {}",
            previous.as_deref().unwrap_or("<none>"),
            name
        );
        Ok(())
    }

    /// Replace the base theme, regenerating the effective theme.
    pub fn set_base_theme(&mut self, theme: Value) {
        self.base_theme = normalize(theme);
        self.theme = match (self.theme_hook.clone(), self.theme_key.clone()) {
            (Some(hook), Some(key)) => hook(self, &key),
            _ => self.base_theme.clone(),
        };
    }

    // -- resolution --

    /// Compute the active state of every dimension.
    pub fn active(&self, props: &PropertyBag) -> ActiveState {
        compute_active(&self.dimensions, &self.options, props)
    }

    /// Use `precomputed` unless the bag bypasses the cache, otherwise compute.
    pub fn active_for<'a>(
        &self,
        props: &PropertyBag,
        precomputed: Option<&'a ActiveState>,
    ) -> Cow<'a, ActiveState> {
        match precomputed {
            Some(state) if !props.cache_disabled() => Cow::Borrowed(state),
            _ => Cow::Owned(self.active(props)),
        }
    }

    /// Resolve a token path. Absence is `None`, never an error.
    pub fn resolve(
        &self,
        path: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<Value> {
        log::trace!("Resolving '{}'", path);

        let (scope, rest) = path.split_once('.').unwrap_or((path, ""));
        match scope {
            "theme" if rest.is_empty() => Some(self.theme.clone()),
            "theme" => path::resolve(&self.theme, rest).cloned(),
            "props" => resolve_prop(props, rest),
            "active" => {
                let state = self.active_for(props, precomputed).to_value();
                if rest.is_empty() {
                    Some(state)
                } else {
                    path::resolve(&state, rest).cloned()
                }
            }
            _ => self.resolve_theme_path(path, props, precomputed),
        }
    }

    fn resolve_theme_path(
        &self,
        path: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<Value> {
        let segments: Vec<&str> = path.split('.').collect();
        let marker = segments
            .iter()
            .position(|s| *s == self.options.active_key)
            .filter(|&i| i > 0 && self.dimensions.contains_key(segments[i - 1]));

        let Some(marker) = marker else {
            return path::resolve(&self.theme, path).cloned();
        };

        let dimension = segments[marker - 1];
        let state = self.active_for(props, precomputed);
        let selection = state.get(dimension)?;
        let substituted = segments[..marker]
            .iter()
            .copied()
            .chain(selection.segments())
            .chain(segments[marker + 1..].iter().copied());
        path::resolve_segments(&self.theme, substituted).cloned()
    }

    /// Resolve a token path and shape the result.
    pub fn token(
        &self,
        path: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
        format: &Format,
    ) -> Option<Value> {
        format.apply(self.resolve(path, props, precomputed))
    }

    /// Parse a condition string with this engine's operator tokens.
    pub fn condition(&self, text: &str) -> Condition {
        Condition::parse_with(text, &self.options.operators)
    }

    /// Evaluate a condition.
    pub fn evaluate(
        &self,
        condition: &Condition,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> bool {
        condition.evaluate(self, props, precomputed)
    }

    /// Evaluate an if/then/else selection.
    pub fn cond(
        &self,
        cond: &Cond,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<Value> {
        cond.resolve(self, props, precomputed)
    }

    /// Run mixin `name` on the value at `path`.
    ///
    /// When `path` does not resolve, the mixin receives the path itself.
    pub fn mixin(
        &self,
        name: &str,
        args: &[Value],
        path: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> MinerResult<Value> {
        let mixin = self
            .mixins
            .get(name)
            .ok_or_else(|| MinerError::missing_mixin(name))?;
        let base = self
            .resolve(path, props, precomputed)
            .unwrap_or_else(|| Value::String(path.to_string()));
        mixin(self, props, base, args)
    }

    /// Evaluate an arithmetic expression over resolved tokens.
    ///
    /// Invalid calculations are logged and yield `None`.
    pub fn calc(
        &self,
        expr: &Expr,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<f64> {
        match expr.eval(&mut |path: &str| self.resolve(path, props, precomputed)) {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Invalid calculation {}: {}", expr, e);
                None
            }
        }
    }

    /// Parse and evaluate a calculation such as `({button.height} * 2) + 8`.
    pub fn calc_str(
        &self,
        text: &str,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<f64> {
        match calc::parse(text) {
            Ok(expr) => self.calc(&expr, props, precomputed),
            Err(e) => {
                log::warn!("Invalid calculation '{}': {}", text, e);
                None
            }
        }
    }

    /// Project `props` onto the style-relevant keys.
    pub fn properties(&self, props: &PropertyBag, local_keys: &[String]) -> Projection {
        properties::project(&self.dimensions, &self.options, props, local_keys)
    }

    /// The option `delta` steps from `value` on a dimension's scale.
    ///
    /// `variant` walks the variant scale instead.
    pub fn closest(
        &self,
        dimension: &str,
        value: &str,
        delta: i64,
        variant: bool,
    ) -> MinerResult<String> {
        let scale = self
            .dimensions
            .get(dimension)
            .ok_or_else(|| MinerError::unknown_dimension(dimension))?
            .scale_for(variant)
            .ok_or_else(|| MinerError::invalid_dimension(dimension, "no variants declared"))?;
        Ok(scale.closest(value, delta).to_string())
    }

    /// Resolver whose paths are prefixed with `scope`.
    pub fn scoped(&self, scope: impl Into<String>) -> Scoped<'_> {
        Scoped::new(self, scope)
    }

    /// Prepare one render: project, compute the active state and bundle helpers.
    pub fn render(
        &self,
        props: &PropertyBag,
        local_keys: &[String],
        options: RenderOptions,
    ) -> Rendered<'_> {
        Rendered::new(self, props, local_keys, options)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("dimensions", &self.dimensions.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .field("mixins", &self.mixins)
            .field("theme_hook", &self.theme_hook.is_some())
            .field("theme_key", &self.theme_key)
            .finish()
    }
}

fn resolve_prop(props: &PropertyBag, rest: &str) -> Option<Value> {
    if rest.is_empty() {
        return Some(props.to_value());
    }
    if let Some(value) = props.get(rest).filter(|v| !v.is_null()) {
        return Some(value.clone());
    }
    let (head, tail) = rest.split_once('.')?;
    path::resolve(props.get(head)?, tail).cloned()
}

fn normalize(theme: Value) -> Value {
    if theme.is_null() {
        Value::Object(Default::default())
    } else {
        theme
    }
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    mixins: MixinRegistry,
    theme_hook: Option<ThemeHook>,
}

impl EngineBuilder {
    /// Create a builder with an empty configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            ..Default::default()
        }
    }

    /// Start from a loaded configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the theme data.
    pub fn theme(mut self, theme: Value) -> Self {
        self.config.theme = theme;
        self
    }

    /// Declare a dimension.
    pub fn dimension(mut self, name: impl Into<String>, dimension: Dimension) -> Self {
        self.config.dimensions.insert(name.into(), dimension);
        self
    }

    /// Replace the engine switches.
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Register a mixin.
    pub fn mixin<F>(mut self, name: impl Into<String>, mixin: F) -> Self
    where
        F: Fn(&Engine, &PropertyBag, Value, &[Value]) -> MinerResult<Value> + Send + Sync + 'static,
    {
        self.mixins.register(name, mixin);
        self
    }

    /// Merge a whole registry in.
    pub fn mixins(mut self, mixins: MixinRegistry) -> Self {
        self.mixins.extend(mixins);
        self
    }

    /// Mutable access to the mixin registry, for bulk registration.
    pub fn mixins_mut(&mut self) -> &mut MixinRegistry {
        &mut self.mixins
    }

    /// Set the theme-switch hook.
    pub fn theme_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Engine, &str) -> Value + Send + Sync + 'static,
    {
        self.theme_hook = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and build the engine.
    ///
    /// When a default theme is configured it is selected right away.
    pub fn build(self) -> MinerResult<Engine> {
        let EngineConfig {
            theme,
            dimensions,
            options,
        } = self.config;

        for (name, dimension) in &dimensions {
            if RESERVED_SCOPES.contains(&name.as_str()) {
                return Err(MinerError::invalid_dimension(
                    name.as_str(),
                    "name collides with a reserved path root",
                ));
            }
            dimension.validate(name)?;
        }

        let theme = normalize(theme);
        let default_theme = options.theming.as_ref().and_then(|t| t.default.clone());

        let mut engine = Engine {
            base_theme: theme.clone(),
            theme,
            dimensions,
            options,
            mixins: self.mixins,
            theme_hook: self.theme_hook,
            theme_key: None,
        };

        if let Some(name) = default_theme {
            engine.set_theme(&name)?;
        }

        log::debug!(
            "Built engine with {} dimensions and {} mixins",
            engine.dimensions.len(),
            engine.mixins.len()
        );
        Ok(engine)
    }
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .field("mixins", &self.mixins)
            .finish()
    }
}
