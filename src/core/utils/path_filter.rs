use std::collections::HashSet;

use glob::{Pattern, PatternError};

/// Check if a path contains glob wildcards.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Matches pod paths against a list of literal paths and glob patterns.
///
/// Literal entries must match exactly. Pattern entries use standard glob
/// semantics where `*` stays within one path segment and `**` crosses them.
///
/// Examples:
/// - `/content/pages/about.yaml` matches only that file
/// - `/content/pages/*.md` matches `/content/pages/intro.md`
/// - `/views/**` matches every file under `/views/`
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    literals: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl PathFilter {
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Result<Self, PatternError> {
        let mut filter = Self::default();
        for path in paths {
            let path = path.as_ref();
            if is_glob_pattern(path) {
                filter.patterns.push(Pattern::new(path)?);
            } else {
                filter.literals.insert(path.to_string());
            }
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.patterns.is_empty()
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.literals.contains(path) {
            return true;
        }
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..Default::default()
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, options))
    }
}
