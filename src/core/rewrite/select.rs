//! File selection: target extensions, excluded names, excluded directories.

use std::collections::HashSet;
use std::path::{Component, Path};

#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    extensions: HashSet<String>,
    excluded_names: HashSet<String>,
    excluded_segments: HashSet<String>,
}

impl FileSelector {
    pub fn new<S: AsRef<str>>(
        extensions: &[S],
        excluded_names: &[S],
        excluded_segments: &[S],
    ) -> Self {
        let set = |values: &[S]| values.iter().map(|v| v.as_ref().to_string()).collect();
        Self {
            extensions: set(extensions),
            excluded_names: set(excluded_names),
            excluded_segments: set(excluded_segments),
        }
    }

    /// Whether `path` (found under `root`) should be rewritten.
    ///
    /// Segment exclusion compares whole directory components of the path
    /// relative to `root`, so `bak` excludes `src/bak/x.lua` but not
    /// `src/bakery/x.lua`, and a root that itself lives under `bak/` still works.
    pub fn is_selected(&self, root: &Path, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.contains(ext) {
            return false;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.excluded_names.contains(&name) {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let in_excluded_dir = relative
            .parent()
            .map(|dir| {
                dir.components().any(|c| match c {
                    Component::Normal(seg) => {
                        self.excluded_segments.contains(&*seg.to_string_lossy())
                    }
                    _ => false,
                })
            })
            .unwrap_or(false);

        !in_excluded_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> FileSelector {
        FileSelector::new(&["lua"], &["urls.lua"], &["bak", "utils"])
    }

    #[test]
    fn selects_by_extension() {
        let root = Path::new("/proj");
        let s = selector();
        assert!(s.is_selected(root, Path::new("/proj/app/foo.lua")));
        assert!(!s.is_selected(root, Path::new("/proj/app/foo.tml")));
        assert!(!s.is_selected(root, Path::new("/proj/app/Makefile")));
        assert!(!s.is_selected(root, Path::new("/proj/app/foo.lua.orig")));
    }

    #[test]
    fn excludes_by_base_name() {
        let s = selector();
        assert!(!s.is_selected(Path::new("/proj"), Path::new("/proj/app/urls.lua")));
        assert!(!s.is_selected(Path::new("/proj"), Path::new("/proj/urls.lua")));
    }

    #[test]
    fn excludes_by_whole_directory_segment() {
        let root = Path::new("/proj");
        let s = selector();
        assert!(!s.is_selected(root, Path::new("/proj/bak/foo.lua")));
        assert!(!s.is_selected(root, Path::new("/proj/lib/utils/init.lua")));
        assert!(s.is_selected(root, Path::new("/proj/bakery/foo.lua")));
        assert!(s.is_selected(root, Path::new("/proj/lib/utils_ext/init.lua")));
    }

    #[test]
    fn segments_above_root_do_not_exclude() {
        let root = Path::new("/home/bak/proj");
        assert!(selector().is_selected(root, Path::new("/home/bak/proj/foo.lua")));
    }
}
