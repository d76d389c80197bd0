//! Legacy whole-file substring rename and search.
//!
//! No line classification, no word boundaries: a file is affected when its
//! content contains the search text anywhere. Only file paths are reported.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::rewrite::RunMode;
use crate::utils::io;

/// A substring rename applied across whole files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyRule {
    pub from: String,
    pub to: String,
}

impl LegacyRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let from = from.into();
        if from.is_empty() {
            return Err(Error::validation_invalid_argument(
                "from",
                "Search text must not be empty",
            ));
        }
        Ok(Self { from, to: to.into() })
    }
}

/// Files that contained a rule's `from` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    pub from: String,
    pub to: String,
    pub files: Vec<PathBuf>,
    pub applied: bool,
}

/// Files containing a search needle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub needle: String,
    pub files: Vec<PathBuf>,
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}

fn candidate_files(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "path",
            format!("Root is not a directory: {}", root.display()),
        ));
    }

    Ok(io::walk_files(root)?
        .into_iter()
        .filter(|p| has_extension(p, extensions))
        .collect())
}

/// Replace every occurrence of each rule's `from` with its `to`, one full
/// pass over the tree per rule, in order.
///
/// `on_file` sees each matching path before it is written.
pub fn replace<F>(
    root: &Path,
    rules: &[LegacyRule],
    extensions: &[&str],
    mode: RunMode,
    mut on_file: F,
) -> Result<Vec<ReplaceOutcome>>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut outcomes = Vec::new();

    for rule in rules {
        let mut files = Vec::new();

        for path in candidate_files(root, extensions)? {
            let content = io::read_text(&path)?;
            if !content.contains(&rule.from) {
                continue;
            }

            on_file(&path)?;
            if mode.is_apply() {
                io::write_file(&path, &content.replace(&rule.from, &rule.to))?;
                log_status!("replace", "Changed {}", path.display());
            }
            files.push(path);
        }

        outcomes.push(ReplaceOutcome {
            from: rule.from.clone(),
            to: rule.to.clone(),
            files,
            applied: mode.is_apply(),
        });
    }

    Ok(outcomes)
}

/// List files containing each needle. Never writes.
pub fn search<S: AsRef<str>>(
    root: &Path,
    needles: &[S],
    extensions: &[&str],
) -> Result<Vec<SearchMatch>> {
    let mut matches = Vec::new();

    for needle in needles {
        let needle = needle.as_ref();
        let mut files = Vec::new();
        for path in candidate_files(root, extensions)? {
            if io::read_text(&path)?.contains(needle) {
                files.push(path);
            }
        }
        matches.push(SearchMatch {
            needle: needle.to_string(),
            files,
        });
    }

    Ok(matches)
}
