#![warn(missing_docs)]

//! # Theme Miner Engine
//!
//! A design-token resolution engine. A theme is a nested mapping of tokens;
//! components declare interactive dimensions (palette, scale, spacing, ...) and
//! the engine turns a component's property bag into concrete style values.
//!
//! ## Overview
//!
//! The engine consists of several key components:
//!
//! - **[Path Resolver](path)**: dotted-path lookup into nested theme data
//! - **[Option Scales](dimension::OptionScale)**: ordered options with clamped navigation
//! - **[Active State](active::ActiveState)**: the selected option of every dimension
//! - **[Conditions](condition::Condition)**: a small predicate language and `cond` branching
//! - **[Engine](engine::Engine)**: token resolution, units, mixins and theme switching
//! - **[Projection](properties::project)**: the style-relevant subset of a property bag
//! - **[Render Handle](render::Rendered)**: per-render bundle for framework adapters
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tminer_engine::dimension::{Dimension, OptionScale, Variants};
//! use tminer_engine::engine::Engine;
//! use tminer_engine::properties::PropertyBag;
//! use tminer_engine::token::Format;
//!
//! let engine = Engine::builder()
//!     .theme(json!({
//!         "palette": { "primary": { "sh+0": "#255BC7", "sh+1": "#4A7BE0" } },
//!         "spacing": { "sp+0": 0, "sp+1": 4 }
//!     }))
//!     .dimension(
//!         "palette",
//!         Dimension::new(OptionScale::new(["primary"], "primary"))
//!             .with_variants(Variants::new("shade", OptionScale::new(["sh+0", "sh+1"], "sh+0"))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let props = PropertyBag::new().with("$sh+1", true);
//! assert_eq!(engine.resolve("palette.active", &props, None), Some(json!("#4A7BE0")));
//! assert_eq!(
//!     engine.token("theme.spacing.sp+1", &props, None, &Format::unit("px")),
//!     Some(json!("4px"))
//! );
//! ```
//!
//! ## Configuration
//!
//! Engines can be configured in code, from TOML or JSON, or from the environment:
//!
//! ```rust
//! use tminer_engine::config::EngineConfig;
//! use tminer_engine::engine::Engine;
//!
//! let config = EngineConfig::from_toml(r#"
//!     [theme.scale]
//!     "sc+0" = { height = 32 }
//!
//!     [dimensions.scale]
//!     options = ["sc+0"]
//!     default = "sc+0"
//! "#).unwrap();
//! let engine = Engine::new(config).unwrap();
//! ```
//!
//! ### Environment Variables
//!
//! ```bash
//! export TMINER_CONFIG=theme.toml   # Load configuration from a file
//! export TMINER_THEME=dark          # Select the initial theme
//! ```
//!
//! ## Caching
//!
//! Computing the active state is the expensive part of a resolution. Callers
//! that resolve many tokens for the same property bag compute it once with
//! [`Engine::active`](engine::Engine::active) and pass it as the `precomputed`
//! argument. A bag built with
//! [`PropertyBag::disable_cache`](properties::PropertyBag::disable_cache)
//! always recomputes.

/// Contains the [active::ActiveState] computation.
pub mod active;
/// Contains the arithmetic [calc::Expr] AST and its parser.
pub mod calc;
/// Contains the [condition::Condition] predicate language.
pub mod condition;
/// Contains the [config::EngineConfig] struct and engine options.
pub mod config;
/// Contains interactive [dimension::Dimension] declarations.
pub mod dimension;
/// Contains the [engine::Engine] and its builder.
pub mod engine;
/// Contains the [error::MinerError] type.
pub mod error;
/// Contains the [mixin::MixinRegistry].
pub mod mixin;
/// Contains dotted-path lookup.
pub mod path;
/// Contains the [properties::PropertyBag] and projection.
pub mod properties;
/// Contains the per-render [render::Rendered] handle.
pub mod render;
/// Contains the [scoped::Scoped] resolver.
pub mod scoped;
/// Contains the [token::Format] output shaping.
pub mod token;
/// Contains loose value semantics.
pub mod value;

pub use active::ActiveState;
pub use condition::{Branch, Cond, Condition};
pub use config::{EngineConfig, EngineOptions};
pub use dimension::{Dimension, OptionScale, Variants};
pub use engine::{Engine, EngineBuilder};
pub use error::{MinerError, MinerResult};
pub use properties::PropertyBag;
pub use token::Format;
