//! Edit scripts replay a recorded sequence of document changes.
//!
//! A script is JSON: a list of steps, each an insertion, removal, replacement, format change,
//! selection or caret move. Replaying a script drives a [`Document`] and its
//! [`DocumentStructure`] exactly the way an editor would, one change notification per step, which
//! makes it possible to watch the outline and counts evolve from the command line.

use crate::document::{Document, Edit, TextDocument};
use crate::error::{Error, Result};
use crate::structure::DocumentStructure;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Deepest heading level a block can carry.
const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Serialisable sequence of document changes applied in order.
pub struct EditScript {
    /// Individual changes, in the order they happened.
    pub steps: Vec<Step>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
/// One recorded change. Positions and lengths are in characters.
pub enum Step {
    /// Type or paste text; newlines split paragraphs.
    Insert {
        /// Where the text goes.
        position: usize,
        /// What is inserted.
        text: String,
    },
    /// Delete text; removing a newline merges paragraphs.
    Remove {
        /// First character removed.
        position: usize,
        /// Characters removed.
        length: usize,
    },
    /// Overwrite a range with new text.
    Replace {
        /// First character replaced.
        position: usize,
        /// Characters replaced.
        length: usize,
        /// Replacement text.
        text: String,
    },
    /// Change the heading level of a paragraph, 0 for body text.
    Heading {
        /// Paragraph index.
        block: usize,
        /// New level.
        level: u8,
    },
    /// Mark or unmark a paragraph as a scene break.
    SceneBreak {
        /// Paragraph index.
        block: usize,
        /// Whether it is a scene break afterwards.
        scene_break: bool,
    },
    /// Select a range of text, or clear the selection when `start == end`.
    Select {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// Move the caret.
    Cursor {
        /// New caret position.
        position: usize,
    },
}

impl EditScript {
    /// Reads a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid script.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Parses a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid script.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies every step to the document and reports each change to the structure.
    ///
    /// Steps before a failing step stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEdit`] for a position past the end of the document, an unknown
    /// paragraph or a heading level above six.
    pub fn apply(&self, doc: &mut Document, structure: &mut DocumentStructure) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            log::trace!("step {index}: {step:?}");
            if let Some(edit) = step.apply(doc, index)? {
                structure.on_edit(doc, &edit);
            }
            match step {
                Step::Select { start, end } => {
                    structure.set_selection(doc, (start < end).then(|| *start..*end));
                }
                Step::Cursor { position } => structure.set_cursor(*position),
                _ => {}
            }
        }
        Ok(())
    }
}

impl Step {
    fn apply(&self, doc: &mut Document, index: usize) -> Result<Option<Edit>> {
        let invalid = |message: String| Error::InvalidEdit {
            step: index,
            message,
        };
        let characters = doc.character_count();
        let blocks = doc.block_count();
        let check_position = |position: usize| {
            if position > characters {
                Err(invalid(format!(
                    "position {position} is past the end of the document ({characters})"
                )))
            } else {
                Ok(())
            }
        };
        let check_block = |block: usize| {
            if block >= blocks {
                Err(invalid(format!(
                    "paragraph {block} does not exist ({blocks} paragraphs)"
                )))
            } else {
                Ok(())
            }
        };

        match self {
            Self::Insert { position, text } => {
                check_position(*position)?;
                Ok(Some(doc.insert(*position, text)))
            }
            Self::Remove { position, length } => {
                check_position(*position)?;
                Ok(Some(doc.remove(*position, *length)))
            }
            Self::Replace {
                position,
                length,
                text,
            } => {
                check_position(*position)?;
                Ok(Some(doc.replace(*position, *length, text)))
            }
            Self::Heading { block, level } => {
                check_block(*block)?;
                if *level > MAX_HEADING_LEVEL {
                    return Err(invalid(format!("heading level {level} is above six")));
                }
                Ok(doc.set_heading_level(*block, *level))
            }
            Self::SceneBreak { block, scene_break } => {
                check_block(*block)?;
                Ok(doc.set_scene_break(*block, *scene_break))
            }
            Self::Select { start, end } => {
                check_position(*start)?;
                check_position(*end)?;
                Ok(None)
            }
            Self::Cursor { position } => {
                check_position(*position)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/edit_script.rs"]
mod tests;
