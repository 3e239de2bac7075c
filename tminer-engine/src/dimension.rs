//! # Interactive Dimensions
//!
//! A dimension is a named axis of style variation (palette, scale, spacing, ...)
//! with an ordered [`OptionScale`] and an optional nested variant scale
//! (shade under palette, size under typography).
//!
//! ```rust
//! use tminer_engine::dimension::{Dimension, OptionScale, Variants};
//!
//! let palette = Dimension::new(OptionScale::new(["black", "white", "primary"], "primary"))
//!     .with_variants(Variants::new(
//!         "shade",
//!         OptionScale::new(["sh-2", "sh-1", "sh+0", "sh+1", "sh+2"], "sh+0"),
//!     ));
//!
//! assert_eq!(palette.variants.unwrap().scale.closest("sh+2", 1), "sh+2");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};

/// Ordered list of option labels with a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionScale {
    /// Option labels, in scale order.
    pub options: Vec<String>,
    /// Label used when nothing selects another one.
    pub default: String,
}

impl OptionScale {
    /// Create a new option scale.
    pub fn new<I, S>(options: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            default: default.into(),
        }
    }

    /// Position of `option` on the scale.
    pub fn index_of(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    /// Check if `option` is on the scale.
    pub fn contains(&self, option: &str) -> bool {
        self.index_of(option).is_some()
    }

    /// The option `delta` steps away from `current`, saturating at both ends.
    ///
    /// Values that are not on the scale come back unchanged.
    pub fn closest<'a>(&'a self, current: &'a str, delta: i64) -> &'a str {
        let Some(index) = self.index_of(current) else {
            return current;
        };
        let last = self.options.len() as i64 - 1;
        let target = (index as i64).saturating_add(delta).clamp(0, last);
        &self.options[target as usize]
    }

    fn validate(&self, owner: &str) -> MinerResult<()> {
        if self.options.is_empty() {
            return Err(MinerError::invalid_dimension(owner, "options must not be empty"));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(MinerError::invalid_dimension(
                    owner,
                    format!("option '{option}' is declared twice"),
                ));
            }
        }
        if !self.contains(&self.default) {
            return Err(MinerError::invalid_dimension(
                owner,
                format!("default '{}' is not one of its options", self.default),
            ));
        }
        Ok(())
    }
}

/// Nested variant scale of a dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variants {
    /// Property name selecting the variant directly (`shade` -> `$shade`).
    pub key: String,
    /// The variant scale.
    #[serde(flatten)]
    pub scale: OptionScale,
}

impl Variants {
    /// Create a variant scale selected through `key`.
    pub fn new(key: impl Into<String>, scale: OptionScale) -> Self {
        Self {
            key: key.into(),
            scale,
        }
    }
}

/// A declared interactive dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// The main option scale.
    #[serde(flatten)]
    pub scale: OptionScale,
    /// Optional variant scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Variants>,
}

impl Dimension {
    /// Create a dimension without variants.
    pub fn new(scale: OptionScale) -> Self {
        Self {
            scale,
            variants: None,
        }
    }

    /// Attach a variant scale.
    pub fn with_variants(mut self, variants: Variants) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Check the declaration invariants: unique options and defaults on their scales.
    pub fn validate(&self, name: &str) -> MinerResult<()> {
        self.scale.validate(name)?;
        if let Some(variants) = &self.variants {
            if variants.key.is_empty() {
                return Err(MinerError::invalid_dimension(name, "variant key must not be empty"));
            }
            variants.scale.validate(&format!("{name}.{}", variants.key))?;
        }
        Ok(())
    }

    /// The scale to walk: the variant scale when `variant` is set.
    pub fn scale_for(&self, variant: bool) -> Option<&OptionScale> {
        if variant {
            self.variants.as_ref().map(|v| &v.scale)
        } else {
            Some(&self.scale)
        }
    }
}
