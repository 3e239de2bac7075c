#![warn(missing_docs)]

//! Resolve design tokens from component state.

pub use serde_json as json;

pub use tminer_engine as engine;
#[cfg(feature = "mixins")]
pub use tminer_mixins as mixins;

/// A "prelude" for users of tminer.
///
/// Importing this module brings into scope the most common types
/// needed to configure an engine and resolve tokens.
///
/// ```rust
/// use tminer::prelude::*;
///
/// let engine = Engine::builder()
///     .theme(json!({ "radius": { "ra+0": 0, "ra+1": 4 } }))
///     .dimension("radius", Dimension::new(OptionScale::new(["ra+0", "ra+1"], "ra+0")))
///     .build()
///     .unwrap();
///
/// let props = PropertyBag::new().with("$radius", "ra+1");
/// assert_eq!(
///     engine.token("radius.active", &props, None, &Format::unit("px")),
///     Some(json!("4px"))
/// );
/// ```
pub mod prelude {
    pub use crate::engine::active::ActiveState;
    pub use crate::engine::condition::{Branch, Cond, Condition};
    pub use crate::engine::config::{EngineConfig, EngineOptions, ThemingOptions};
    pub use crate::engine::dimension::{Dimension, OptionScale, Variants};
    pub use crate::engine::engine::{Engine, EngineBuilder};
    pub use crate::engine::error::{MinerError, MinerResult};
    pub use crate::engine::properties::PropertyBag;
    pub use crate::engine::render::{RenderOptions, Rendered};
    pub use crate::engine::token::Format;

    // Values
    pub use serde_json::{json, Value};

    #[cfg(feature = "mixins")]
    pub use crate::mixins::register_defaults;
}
