#![warn(missing_docs)]

//! # Stock Mixins
//!
//! Ready-made mixins for palette-driven components:
//!
//! | Name | Function |
//! |---|---|
//! | `paint` | [`palette::paint`] |
//! | `paint_fg` | [`palette::paint_fg`] |
//! | `as_active` | [`palette::as_active`] |
//! | `as_hover` | [`palette::as_hover`] |
//! | `debug` | [`debug::debug`] |
//!
//! ```rust
//! use serde_json::json;
//! use tminer_engine::engine::Engine;
//! use tminer_engine::properties::PropertyBag;
//!
//! let mut builder = Engine::builder().theme(json!({ "bg": "#255BC7" }));
//! tminer_mixins::register_defaults(&mut builder);
//! let engine = builder.build().unwrap();
//!
//! let props = PropertyBag::new().with("$color", "#ffffff").with("$negative", true);
//! assert_eq!(engine.mixin("paint", &[], "bg", &props, None).unwrap(), json!("#000"));
//! ```

/// Contains hex parsing and lightness shifts.
pub mod color;
/// Contains the `debug` border mixin.
pub mod debug;
/// Contains the palette mixins.
pub mod palette;

use tminer_engine::engine::EngineBuilder;
use tminer_engine::mixin::MixinRegistry;

/// Registry holding every stock mixin.
pub fn defaults() -> MixinRegistry {
    let mut mixins = MixinRegistry::new();
    mixins.register("paint", palette::paint);
    mixins.register("paint_fg", palette::paint_fg);
    mixins.register("as_active", palette::as_active);
    mixins.register("as_hover", palette::as_hover);
    mixins.register("debug", debug::debug);
    mixins
}

/// Register every stock mixin on `builder`. Mixins already registered under the
/// same names are replaced.
pub fn register_defaults(builder: &mut EngineBuilder) {
    builder.mixins_mut().extend(defaults());
}
