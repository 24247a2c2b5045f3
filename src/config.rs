//! Configuration to acknowledge writer preferences as well as set defaults.
//!
//! Specifically, we try to find a manuscript.toml, and if present we load settings from there.
//! This provides page size, comment handling, recount scheduling and file extension preferences.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::path::Path;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "manuscript.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from manuscript.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 250)]
    /// Words that fill one manuscript page.
    pub words_per_page: usize,
    #[facet(default = true)]
    /// Count segment words on the worker pool instead of the editing thread.
    pub background_recount: bool,
    #[facet(default = true)]
    /// Leave bracketed comments out of word counts.
    pub comment_exclusion: bool,
    #[facet(default = "***".to_string())]
    /// Paragraph text that marks a scene break when loading documents.
    pub scene_break: String,
    #[facet(default = vec!["md".to_string(), "txt".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_per_page: 250,
            background_recount: true,
            comment_exclusion: true,
            scene_break: "***".to_string(),
            file_extensions: vec!["md".to_string(), "txt".to_string()],
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from manuscript.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from the given file, using defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        Self::from_toml(&contents).unwrap_or_else(|err| {
            log::warn!("ignoring {}: {err}", path.display());
            Self::default()
        })
    }

    /// Parse configuration from TOML text, filling in defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|err| Error::Config(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
