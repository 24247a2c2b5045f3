//! Locating manuscript files and loading them into documents.

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::formats;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Expands the given paths into a sorted list of files.
///
/// Files named directly are always kept. Directories are walked recursively and only files whose
/// extension is in `extensions` are kept. With no paths the working directory is walked.
///
/// # Errors
///
/// Returns an error if a path or directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for path in paths {
        if fs::metadata(&path)?.is_dir() {
            walk(&path, extensions, &mut documents)?;
        } else {
            documents.push(path);
        }
    }
    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn walk(dir: &Path, extensions: &[String], found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed.
        if entry.file_type()?.is_dir() {
            walk(&path, extensions, found)?;
        } else if has_extension(&path, extensions) {
            found.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Reads a file and parses it with the format matching its extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path, config: &Config) -> Result<Document> {
    let source = fs::read_to_string(path)?;
    let format = formats::for_path(path);
    log::debug!("loading {} as {}", path.display(), format.name());
    format.parse(&source, config)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
