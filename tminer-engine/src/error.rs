//! # Engine Error Types
//!
//! Structural misconfiguration is the only thing that fails loudly in this crate.
//! Absent tokens are ordinary results (`None`) and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or driving the engine.
#[derive(Error, Debug)]
pub enum MinerError {
    /// A mixin was requested that is not registered.
    #[error("Missing mixin: {name}. Register it under mixins.{name} on the engine")]
    MissingMixin {
        /// The name of the mixin that was not found.
        name: String,
    },

    /// A configuration field required by the requested operation is absent.
    #[error("Missing required option '{field}'")]
    MissingOption {
        /// Dotted name of the missing field.
        field: String,
    },

    /// An interactive dimension declaration is inconsistent.
    #[error("Invalid dimension '{dimension}': {details}")]
    InvalidDimension {
        /// The dimension name.
        dimension: String,
        /// What is wrong with it.
        details: String,
    },

    /// A dimension was referenced that was never declared.
    #[error("Unknown dimension '{name}'")]
    UnknownDimension {
        /// The referenced name.
        name: String,
    },

    /// A theme switch targeted a theme that does not exist.
    #[error("Theme '{name}' not found")]
    UnknownTheme {
        /// The name of the theme that was not found.
        name: String,
    },

    /// Configuration file could not be read.
    #[error("Failed to read configuration file {path:?}: {source}")]
    ConfigRead {
        /// The path that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text could not be parsed.
    #[error("Failed to parse configuration {path:?}: {details}")]
    ConfigParse {
        /// Where the text came from.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// Configuration file has an extension we do not read.
    #[error("Unsupported configuration file format: {path:?}. Use .toml or .json")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// A registered mixin failed on its own terms.
    #[error("Mixin '{name}' failed: {details}")]
    Mixin {
        /// The mixin name.
        name: String,
        /// Error message from the mixin.
        details: String,
    },
}

/// Result type alias for engine operations.
pub type MinerResult<T> = Result<T, MinerError>;

impl MinerError {
    /// Create a missing mixin error.
    pub fn missing_mixin(name: impl Into<String>) -> Self {
        Self::MissingMixin { name: name.into() }
    }

    /// Create a missing option error.
    pub fn missing_option(field: impl Into<String>) -> Self {
        Self::MissingOption {
            field: field.into(),
        }
    }

    /// Create an invalid dimension error.
    pub fn invalid_dimension(dimension: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidDimension {
            dimension: dimension.into(),
            details: details.into(),
        }
    }

    /// Create an unknown dimension error.
    pub fn unknown_dimension(name: impl Into<String>) -> Self {
        Self::UnknownDimension { name: name.into() }
    }

    /// Create an unknown theme error.
    pub fn unknown_theme(name: impl Into<String>) -> Self {
        Self::UnknownTheme { name: name.into() }
    }

    /// Create a configuration parse error.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create a mixin failure.
    pub fn mixin(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Mixin {
            name: name.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mixin_names_the_mixin() {
        let err = MinerError::missing_mixin("asHover");
        assert!(err.to_string().contains("asHover"));
        assert!(matches!(err, MinerError::MissingMixin { ref name } if name == "asHover"));
    }

    #[test]
    fn test_missing_option_message() {
        let err = MinerError::missing_option("options.theming.palette_key");
        assert_eq!(
            err.to_string(),
            "Missing required option 'options.theming.palette_key'"
        );
    }
}
