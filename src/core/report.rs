//! Plain-text rendering of rewrite and legacy results.

use std::path::Path;

use crate::rewrite::{FileHits, RewriteReport};

/// Width the line number is right-justified to.
const LINE_NUMBER_WIDTH: usize = 5;

/// Render one affected file: its path, then one line per hit.
pub fn render_file_hits(file: &FileHits) -> String {
    let mut out = format!("{}\n", file.path.display());
    for hit in &file.hits {
        out.push_str(&format!(
            "{:>width$}  {}\n",
            hit.line,
            hit.original.trim(),
            width = LINE_NUMBER_WIDTH
        ));
    }
    out
}

pub fn render_report(report: &RewriteReport) -> String {
    report.files.iter().map(render_file_hits).collect()
}

/// Render a legacy path listing, one path per line.
pub fn render_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| format!("{}\n", p.as_ref().display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::Hit;
    use std::path::PathBuf;

    #[test]
    fn file_hits_render_right_justified_and_trimmed() {
        let path = PathBuf::from("app/foo.lua");
        let file = FileHits {
            path: path.clone(),
            hits: vec![
                Hit {
                    path: path.clone(),
                    line: 2,
                    original: "    x = dict(1,2)  ".to_string(),
                },
                Hit {
                    path,
                    line: 120,
                    original: "y = list()".to_string(),
                },
            ],
        };

        assert_eq!(
            render_file_hits(&file),
            "app/foo.lua\n    2  x = dict(1,2)\n  120  y = list()\n"
        );
    }

    #[test]
    fn empty_report_renders_nothing() {
        assert_eq!(render_report(&RewriteReport::default()), "");
    }

    #[test]
    fn legacy_paths_render_one_per_line() {
        let paths = vec![PathBuf::from("a.tml"), PathBuf::from("lib/b.lua")];
        assert_eq!(render_paths(&paths), "a.tml\nlib/b.lua\n");
    }
}
