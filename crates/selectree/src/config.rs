//! Configuration for [`SelectionState`](crate::SelectionState).
//!
//! The configuration is plain data and can be built in code or loaded from
//! TOML:
//!
//! ```
//! use selectree::SelectionConfig;
//!
//! let config = SelectionConfig::from_toml_str(r#"
//! strict_paths = false
//!
//! [count_label]
//! template = "{count} selected"
//! hide_zero = false
//! "#)?;
//!
//! assert_eq!(config.count_label.format(0), "0 selected");
//! # Ok::<(), selectree::Error>(())
//! ```

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use selectree_core::logging::targets;

use crate::error::{Error, Result};

/// Placeholder substituted by [`CountLabelFormat::format`].
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// Selection engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Panic when an operation is given a path that does not resolve.
    ///
    /// Such a path is a programming error. Enabled by default in debug
    /// builds; release builds log the error and return it.
    pub strict_paths: bool,
    /// How selected-leaf counts are rendered into labels.
    pub count_label: CountLabelFormat,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strict_paths: cfg!(debug_assertions),
            count_label: CountLabelFormat::default(),
        }
    }
}

impl SelectionConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), ?config, "loaded selection config");
        Ok(config)
    }

    /// Returns this configuration with `strict_paths` set.
    pub fn with_strict_paths(mut self, strict: bool) -> Self {
        self.strict_paths = strict;
        self
    }
}

/// Formatting of the "(N)" label shown next to a select-all switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountLabelFormat {
    /// Label text; `{count}` is replaced by the selected-leaf count.
    pub template: String,
    /// Render an empty label when nothing is selected.
    pub hide_zero: bool,
}

impl Default for CountLabelFormat {
    fn default() -> Self {
        Self {
            template: format!("({COUNT_PLACEHOLDER})"),
            hide_zero: true,
        }
    }
}

impl CountLabelFormat {
    /// Renders the label for `count` selected leaves.
    pub fn format(&self, count: usize) -> String {
        if count == 0 && self.hide_zero {
            return String::new();
        }
        self.template.replace(COUNT_PLACEHOLDER, &count.to_string())
    }
}
