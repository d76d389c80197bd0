//! Protected-line detection.

/// Decides whether a line must pass through the rewriter untouched.
pub trait LineClassifier {
    fn is_protected(&self, line: &str) -> bool;
}

impl<F> LineClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_protected(&self, line: &str) -> bool {
        self(line)
    }
}

/// Protects any line containing one of a set of marker substrings.
///
/// The default markers are `local ` (a declaration, usually the definition
/// of the very name being redirected) and `--` (a Lua comment).
#[derive(Debug, Clone, Default)]
pub struct MarkerClassifier {
    markers: Vec<String>,
}

impl MarkerClassifier {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Self {
        Self {
            markers: markers
                .iter()
                .map(|m| m.as_ref().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl LineClassifier for MarkerClassifier {
    fn is_protected(&self, line: &str) -> bool {
        self.markers.iter().any(|m| line.contains(m.as_str()))
    }
}
