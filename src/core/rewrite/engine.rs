//! Rewrite engine: walk, select, classify, substitute, write back.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::classify::{LineClassifier, MarkerClassifier};
use super::rules::RuleChain;
use super::select::FileSelector;
use crate::defaults::RewriteConfig;
use crate::error::{Error, Result};
use crate::utils::io;

// ============================================================================
// Types
// ============================================================================

/// Whether a run writes results back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    DryRun,
    Apply,
}

impl RunMode {
    pub fn from_write_flag(write: bool) -> Self {
        if write {
            RunMode::Apply
        } else {
            RunMode::DryRun
        }
    }

    pub fn is_apply(&self) -> bool {
        matches!(self, RunMode::Apply)
    }
}

/// A line that was (or would be) rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub path: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Line content before substitution, without its terminator.
    pub original: String,
}

/// All hits for one file, in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHits {
    pub path: PathBuf,
    pub hits: Vec<Hit>,
}

/// Result of a run. Files appear in traversal order; only files with at
/// least one hit are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub files: Vec<FileHits>,
    pub applied: bool,
}

impl RewriteReport {
    pub fn get(&self, path: &Path) -> Option<&[Hit]> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.hits.as_slice())
    }

    pub fn total_hits(&self) -> usize {
        self.files.iter().map(|f| f.hits.len()).sum()
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ============================================================================
// Line handling
// ============================================================================

/// Split text into (body, terminator) pairs. Terminators are kept exactly
/// (`\n`, `\r\n`, or empty for an unterminated final line).
fn split_lines(content: &str) -> Vec<(&str, &str)> {
    content
        .split_inclusive('\n')
        .map(|line| {
            if let Some(body) = line.strip_suffix("\r\n") {
                (body, "\r\n")
            } else if let Some(body) = line.strip_suffix('\n') {
                (body, "\n")
            } else {
                (line, "")
            }
        })
        .collect()
}

// ============================================================================
// Rewriter
// ============================================================================

pub struct Rewriter {
    rules: RuleChain,
    selector: FileSelector,
    classifier: Box<dyn LineClassifier>,
}

impl Rewriter {
    pub fn new(
        rules: RuleChain,
        selector: FileSelector,
        classifier: impl LineClassifier + 'static,
    ) -> Self {
        Self {
            rules,
            selector,
            classifier: Box::new(classifier),
        }
    }

    /// Build a rewriter from built-in or file-loaded configuration.
    pub fn from_config(config: &RewriteConfig) -> Result<Self> {
        let rules = RuleChain::from_config(&config.rules)?;
        let selector = FileSelector::new(
            &config.extensions,
            &config.excluded_names,
            &config.excluded_segments,
        );
        let classifier = MarkerClassifier::new(&config.protected_markers);
        Ok(Self::new(rules, selector, classifier))
    }

    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    /// Rewrite one file's content. Returns the new content and the hits, or
    /// `None` when no line changed.
    pub fn rewrite_content(&self, path: &Path, content: &str) -> Option<(String, Vec<Hit>)> {
        let mut output = String::with_capacity(content.len());
        let mut hits = Vec::new();

        for (index, (body, terminator)) in split_lines(content).into_iter().enumerate() {
            let rewritten = if self.classifier.is_protected(body) {
                None
            } else {
                self.rules.first_match(body)
            };

            match rewritten {
                Some(m) => {
                    hits.push(Hit {
                        path: path.to_path_buf(),
                        line: index + 1,
                        original: body.to_string(),
                    });
                    output.push_str(&m.rewritten);
                }
                None => output.push_str(body),
            }
            output.push_str(terminator);
        }

        if hits.is_empty() {
            None
        } else {
            Some((output, hits))
        }
    }

    /// Run over `root` and collect the report.
    pub fn run(&self, root: &Path, mode: RunMode) -> Result<RewriteReport> {
        self.run_with(root, mode, |_| Ok(()))
    }

    /// Run over `root`, handing each affected file to `on_file` before it is
    /// written. An error from `on_file`, a read, or a write aborts the run;
    /// files already written stay written.
    pub fn run_with<F>(&self, root: &Path, mode: RunMode, mut on_file: F) -> Result<RewriteReport>
    where
        F: FnMut(&FileHits) -> Result<()>,
    {
        if !root.is_dir() {
            return Err(Error::validation_invalid_argument(
                "path",
                format!("Root is not a directory: {}", root.display()),
            ));
        }

        let mut report = RewriteReport {
            files: Vec::new(),
            applied: mode.is_apply(),
        };

        for path in io::walk_files(root)? {
            if !self.selector.is_selected(root, &path) {
                continue;
            }

            let content = io::read_text(&path)?;
            let Some((new_content, hits)) = self.rewrite_content(&path, &content) else {
                continue;
            };

            let file_hits = FileHits {
                path: path.clone(),
                hits,
            };
            on_file(&file_hits)?;

            if mode.is_apply() {
                io::write_file(&path, &new_content)?;
                log_status!(
                    "rewrite",
                    "Rewrote {} line(s) in {}",
                    file_hits.hits.len(),
                    path.display()
                );
            }

            report.files.push(file_hits);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rewriter() -> Rewriter {
        Rewriter::from_config(&RewriteConfig::default()).unwrap()
    }

    #[test]
    fn split_lines_keeps_terminators() {
        assert_eq!(
            split_lines("a\nb\r\nc"),
            vec![("a", "\n"), ("b", "\r\n"), ("c", "")]
        );
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![("", "\n")]);
    }

    #[test]
    fn rewrite_content_skips_protected_lines() {
        let path = Path::new("foo.lua");
        let (out, hits) = rewriter()
            .rewrite_content(path, "local dict = {}\nx = dict(1,2)\n")
            .unwrap();

        assert_eq!(out, "local dict = {}\nx = utils.dict(1,2)\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
        assert_eq!(hits[0].original, "x = dict(1,2)");
    }

    #[test]
    fn rewrite_content_preserves_crlf_and_missing_final_newline() {
        let path = Path::new("foo.lua");
        let (out, _) = rewriter()
            .rewrite_content(path, "a = 1\r\nb = list(a)\r\nc = split(b)")
            .unwrap();
        assert_eq!(out, "a = 1\r\nb = utils.list(a)\r\nc = utils.split(b)");
    }

    #[test]
    fn rewrite_content_returns_none_without_hits() {
        let path = Path::new("foo.lua");
        assert!(rewriter()
            .rewrite_content(path, "-- dict()\nprint(1)\n")
            .is_none());
    }

    #[test]
    fn custom_classifier_plugs_in() {
        let rules = RuleChain::from_pairs(&[("dict", "utils.dict")]).unwrap();
        let selector = FileSelector::new(&["lua"], &[], &[]);
        let rw = Rewriter::new(rules, selector, |line: &str| line.ends_with("-- keep"));

        let (out, hits) = rw
            .rewrite_content(Path::new("a.lua"), "dict() -- keep? no\ndict() -- keep\n")
            .unwrap();
        assert_eq!(out, "utils.dict() -- keep? no\ndict() -- keep\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn dry_run_never_writes() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("foo.lua");
        fs::write(&file, "x = dict(1)\n").unwrap();

        let report = rewriter().run(dir.path(), RunMode::DryRun).unwrap();

        assert_eq!(report.total_hits(), 1);
        assert!(!report.applied);
        assert_eq!(fs::read_to_string(&file).unwrap(), "x = dict(1)\n");
    }

    #[test]
    fn apply_writes_and_reports_each_file_first() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("foo.lua");
        fs::write(&file, "x = dict(1)\n").unwrap();

        let mut seen = Vec::new();
        let report = rewriter()
            .run_with(dir.path(), RunMode::Apply, |fh| {
                // Callback runs before the write.
                assert_eq!(fs::read_to_string(&fh.path).unwrap(), "x = dict(1)\n");
                seen.push(fh.path.clone());
                Ok(())
            })
            .unwrap();

        assert!(report.applied);
        assert_eq!(seen, vec![file.clone()]);
        assert_eq!(fs::read_to_string(&file).unwrap(), "x = utils.dict(1)\n");
    }

    #[test]
    fn callback_error_aborts_before_write() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("foo.lua");
        fs::write(&file, "x = dict(1)\n").unwrap();

        let result = rewriter().run_with(dir.path(), RunMode::Apply, |_| {
            Err(Error::internal_unexpected("stop"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "x = dict(1)\n");
    }

    #[test]
    fn write_error_aborts_and_keeps_earlier_writes() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.lua");
        let second = dir.path().join("b.lua");
        let third = dir.path().join("c.lua");
        fs::write(&first, "x = dict(1)\n").unwrap();
        fs::write(&second, "y = list(2)\n").unwrap();
        fs::write(&third, "z = split(s)\n").unwrap();

        // Swap b.lua for a directory after it is read, so its write fails
        // even when permissions would not stop it.
        let result = rewriter().run_with(dir.path(), RunMode::Apply, |fh| {
            if fh.path == second {
                fs::remove_file(&fh.path).unwrap();
                fs::create_dir(&fh.path).unwrap();
            }
            Ok(())
        });

        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(fs::read_to_string(&first).unwrap(), "x = utils.dict(1)\n");
        assert_eq!(fs::read_to_string(&third).unwrap(), "z = split(s)\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_not_walked_twice() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/a.lua"), "x = dict(1)\n").unwrap();
        symlink(dir.path().join("app"), dir.path().join("zlink")).unwrap();

        let dry = rewriter().run(dir.path(), RunMode::DryRun).unwrap();
        let applied = rewriter().run(dir.path(), RunMode::Apply).unwrap();

        assert_eq!(dry.total_files(), 1);
        assert_eq!(dry.files, applied.files);
    }

    #[test]
    fn invalid_utf8_aborts_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.lua"), [0xffu8, 0xfe, b'\n']).unwrap();

        let err = rewriter().run(dir.path(), RunMode::DryRun).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.encoding_error");
    }

    #[test]
    fn missing_root_is_a_validation_error() {
        let err = rewriter()
            .run(Path::new("/nonexistent/root"), RunMode::DryRun)
            .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
