//! # Engine Configuration
//!
//! Configuration for an [`Engine`](crate::engine::Engine): the theme data, the
//! interactive dimensions and the option switches. It can be built in code, or
//! loaded from TOML/JSON text and files.
//!
//! ## Environment Variables
//!
//! - `TMINER_CONFIG`: path to a `.toml` or `.json` configuration file
//! - `TMINER_THEME`: initial theme name, overriding `options.theming.default`
//!
//! ## Configuration File Format
//!
//! ```toml
//! [options]
//! use_option_flags = false
//! properties = ["$debug"]
//!
//! [options.theming]
//! palette_key = "palette"
//! default = "white"
//!
//! [options.theming.themes.white]
//! mode = "light"
//!
//! [dimensions.palette]
//! options = ["black", "white", "primary"]
//! default = "primary"
//! variants = { key = "shade", options = ["sh-1", "sh+0", "sh+1"], default = "sh+0" }
//!
//! [theme.palette.primary]
//! "sh+0" = "#255BC7"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dimension::Dimension;
use crate::error::{MinerError, MinerResult};

/// Operator tokens recognised inside condition strings.
///
/// Binary operators include their surrounding spaces; prefix markers do not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorTokens {
    /// Not-in list membership.
    pub nin: String,
    /// In list membership.
    #[serde(rename = "in")]
    pub is_in: String,
    /// Loose inequality.
    pub ne: String,
    /// Loose equality.
    pub eq: String,
    /// Greater than.
    pub gt: String,
    /// Greater than or equal.
    pub gte: String,
    /// Less than.
    pub lt: String,
    /// Less than or equal.
    pub lte: String,
    /// Prefix marker for "is not set".
    pub nset: String,
    /// Prefix marker for "equals false".
    #[serde(rename = "false")]
    pub is_false: String,
    /// Prefix marker for "equals true".
    #[serde(rename = "true")]
    pub is_true: String,
}

impl Default for OperatorTokens {
    fn default() -> Self {
        Self {
            nin: " nin ".to_string(),
            is_in: " in ".to_string(),
            ne: " != ".to_string(),
            eq: " == ".to_string(),
            gt: " > ".to_string(),
            gte: " >= ".to_string(),
            lt: " < ".to_string(),
            lte: " <= ".to_string(),
            nset: "!".to_string(),
            is_false: "!!".to_string(),
            is_true: "==".to_string(),
        }
    }
}

/// A named theme under the palette key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    /// Free-form mode label such as `light` or `dark`.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Theme switching configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemingOptions {
    /// Top-level theme key whose children are the switchable themes.
    #[serde(default)]
    pub palette_key: Option<String>,
    /// Theme selected at construction.
    #[serde(default)]
    pub default: Option<String>,
    /// Known themes and their metadata.
    #[serde(default)]
    pub themes: IndexMap<String, ThemeEntry>,
}

/// Engine-wide switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Honor option labels as standalone boolean properties (`$primary: true`).
    pub use_option_flags: bool,
    /// Honor variant labels as standalone boolean properties (`$sh+1: true`).
    pub use_variant_flags: bool,
    /// Prefix dimension and flag properties with [`transient_prefix`](Self::transient_prefix).
    pub use_transient: bool,
    /// Reserved prefix for transient properties.
    pub transient_prefix: String,
    /// Path segment marking the active selection of a dimension.
    pub active_key: String,
    /// Globally projected property names, taken verbatim.
    pub properties: Vec<String>,
    /// Operator tokens for condition strings.
    pub operators: OperatorTokens,
    /// Theme switching configuration.
    pub theming: Option<ThemingOptions>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            use_option_flags: true,
            use_variant_flags: true,
            use_transient: true,
            transient_prefix: "$".to_string(),
            active_key: "active".to_string(),
            properties: Vec::new(),
            operators: OperatorTokens::default(),
            theming: None,
        }
    }
}

impl EngineOptions {
    /// Property name used for `name` in property bags.
    ///
    /// ```rust
    /// use tminer_engine::config::EngineOptions;
    ///
    /// assert_eq!(EngineOptions::default().key("palette"), "$palette");
    /// ```
    pub fn key(&self, name: &str) -> String {
        if self.use_transient {
            format!("{}{}", self.transient_prefix, name)
        } else {
            name.to_string()
        }
    }

    /// Palette key, or the error naming the missing option.
    pub fn palette_key(&self) -> MinerResult<&str> {
        self.theming
            .as_ref()
            .and_then(|t| t.palette_key.as_deref())
            .ok_or_else(|| MinerError::missing_option("options.theming.palette_key"))
    }
}

/// Complete, serializable engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nested theme data.
    pub theme: Value,
    /// Interactive dimensions, in declaration order.
    pub dimensions: IndexMap<String, Dimension>,
    /// Engine switches.
    pub options: EngineOptions,
}

impl EngineConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            theme: Value::Object(Default::default()),
            ..Default::default()
        }
    }

    /// Set the theme data.
    pub fn with_theme(mut self, theme: Value) -> Self {
        self.theme = theme;
        self
    }

    /// Declare a dimension.
    pub fn with_dimension(mut self, name: impl Into<String>, dimension: Dimension) -> Self {
        self.dimensions.insert(name.into(), dimension);
        self
    }

    /// Replace the engine switches.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Load configuration from a file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MinerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MinerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::parse_toml(&content, path),
            Some("json") => Self::parse_json(&content, path),
            _ => Err(MinerError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Load configuration from TOML content.
    pub fn from_toml(content: &str) -> MinerResult<Self> {
        Self::parse_toml(content, Path::new("<toml>"))
    }

    /// Load configuration from JSON content.
    pub fn from_json(content: &str) -> MinerResult<Self> {
        Self::parse_json(content, Path::new("<json>"))
    }

    /// Load configuration from `TMINER_CONFIG`, or use an empty configuration.
    ///
    /// `TMINER_THEME` then overrides the initial theme name.
    pub fn from_env_or_default() -> Self {
        let mut config = match env::var("TMINER_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring TMINER_CONFIG: {}", e);
                Self::new()
            }),
            Err(_) => Self::new(),
        };

        if let Ok(theme) = env::var("TMINER_THEME") {
            config
                .options
                .theming
                .get_or_insert_with(ThemingOptions::default)
                .default = Some(theme);
        }

        config
    }

    fn parse_toml(content: &str, path: &Path) -> MinerResult<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| MinerError::parse_error(path, e.to_string()))?;
        config.normalize_theme();
        Ok(config)
    }

    fn parse_json(content: &str, path: &Path) -> MinerResult<Self> {
        let mut config: Self = serde_json::from_str(content)
            .map_err(|e| MinerError::parse_error(path, e.to_string()))?;
        config.normalize_theme();
        Ok(config)
    }

    fn normalize_theme(&mut self) {
        if self.theme.is_null() {
            self.theme = Value::Object(Default::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOML: &str = r##"
[options]
use_option_flags = false
properties = ["$debug"]

[options.theming]
palette_key = "palette"
default = "white"

[options.theming.themes.white]
mode = "light"

[options.theming.themes.black]
mode = "dark"

[dimensions.palette]
options = ["black", "white", "primary"]
default = "primary"
variants = { key = "shade", options = ["sh-1", "sh+0", "sh+1"], default = "sh+0" }

[dimensions.scale]
options = ["sc-1", "sc+0", "sc+1"]
default = "sc+0"

[theme.palette.primary]
"sh+0" = "#255BC7"

[theme.spacing]
"sp+0" = 0
"##;

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml(TOML).unwrap();
        assert!(!config.options.use_option_flags);
        assert!(config.options.use_variant_flags);
        assert_eq!(config.options.transient_prefix, "$");
        assert_eq!(config.options.properties, vec!["$debug".to_string()]);
        assert_eq!(config.dimensions.keys().collect::<Vec<_>>(), ["palette", "scale"]);
        assert_eq!(config.theme["palette"]["primary"]["sh+0"], json!("#255BC7"));
        assert_eq!(config.theme["spacing"]["sp+0"], json!(0));

        let theming = config.options.theming.unwrap();
        assert_eq!(theming.default.as_deref(), Some("white"));
        assert_eq!(theming.themes["black"].mode.as_deref(), Some("dark"));
    }

    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json(
            r#"{ "dimensions": { "radius": { "options": ["ra+0", "ra+1"], "default": "ra+0" } },
                 "options": { "operators": { "eq": " is " } } }"#,
        )
        .unwrap();
        assert_eq!(config.options.operators.eq, " is ");
        assert_eq!(config.options.operators.ne, " != ");
        assert!(config.theme.is_object());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = EngineConfig::from_toml("[options\n").unwrap_err();
        assert!(matches!(err, MinerError::ConfigParse { .. }));
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("tminer_config_test.yaml");
        fs::write(&path, "theme: {}").unwrap();
        let err = EngineConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, MinerError::UnsupportedFormat { .. }));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_file_toml() {
        let path = std::env::temp_dir().join("tminer_config_test.toml");
        fs::write(&path, TOML).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.dimensions.len(), 2);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, MinerError::ConfigRead { .. }));
    }

    #[test]
    fn test_key_without_transient() {
        let options = EngineOptions {
            use_transient: false,
            ..EngineOptions::default()
        };
        assert_eq!(options.key("palette"), "palette");
    }

    #[test]
    fn test_palette_key_missing() {
        let err = EngineOptions::default().palette_key().unwrap_err();
        assert!(matches!(err, MinerError::MissingOption { .. }));
    }
}
