//! manuscript: outline segmentation and incremental word accounting for long-form writing.
//!
//! A [`document::Document`] is a sequence of paragraph blocks. A
//! [`structure::DocumentStructure`] divides it into heading-anchored segments, keeps their word
//! counts up to date as edits arrive, and publishes [`events::Notification`]s when the outline or
//! any count changes. Words are found by [`words::WordIterator`], which understands hyphenation,
//! apostrophes and bracketed comments.
#![allow(clippy::multiple_crate_versions)]

pub mod comments;
pub mod config;
pub mod counter;
pub mod document;
pub mod edit_script;
pub mod error;
pub mod events;
pub mod formats;
pub mod input;
pub mod report;
pub mod segment;
pub mod selection;
pub mod structure;
pub mod symbols;
pub mod words;

pub use error::{Error, Result};
