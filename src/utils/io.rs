//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a file as UTF-8 text.
///
/// Unlike `fs::read_to_string`, an encoding failure is reported as
/// `internal.encoding_error` carrying the offending path, so the caller can
/// tell a bad file apart from a permission problem.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", path.display()))))?;

    String::from_utf8(bytes)
        .map_err(|e| Error::internal_encoding(path.display().to_string(), e.to_string()))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("write {}", path.display()))))
}

/// List a directory's entries sorted by file name, with each entry's own
/// file type. Symlinks are reported as symlinks, not as their targets.
pub fn list_dir(dir: &Path) -> Result<Vec<(PathBuf, fs::FileType)>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;
        let file_type = entry.file_type().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", entry.path().display())))
        })?;
        paths.push((entry.path(), file_type));
    }
    paths.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}

/// Recursively collect every regular file under `root`, depth first, in
/// file-name order within each directory. Symlinks are never followed.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_recursive(root, &mut files)?;
    Ok(files)
}

fn walk_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for (path, file_type) in list_dir(dir)? {
        if file_type.is_dir() {
            walk_recursive(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
