//! Errors raised while loading documents, edit scripts and configuration.
//!
//! The segmentation engine itself never fails: lookups return `None` and ambiguous edits fall
//! back to a full rebuild. Only the layers that touch files or parse input return [`Result`].

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
/// Failures of the I/O and parsing layers.
pub enum Error {
    /// Reading a document or script failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An edit script was not valid JSON.
    #[error("invalid edit script: {0}")]
    Json(#[from] serde_json::Error),
    /// The tree-sitter grammar could not be loaded.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// A tree-sitter query did not compile.
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser produced no tree.
    #[error("failed to parse {0}")]
    Parse(String),
    /// The configuration file could not be understood.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An edit script step refers to something that does not exist.
    #[error("invalid edit at step {step}: {message}")]
    InvalidEdit {
        /// Zero-based index of the failing step.
        step: usize,
        /// What was wrong with it.
        message: String,
    },
}
