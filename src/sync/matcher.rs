//! Glob matching of branch names against source/target patterns

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};

/// `*` and `?` cross `/`, so `release/*` matches `release/1.0/hotfix`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled shell-style branch pattern (`*`, `?`, `[...]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPattern {
    raw: String,
    pattern: Pattern,
}

impl BranchPattern {
    /// Compile a pattern, rejecting malformed globs up front
    pub fn parse(raw: &str) -> Result<Self> {
        let pattern = Pattern::new(raw)
            .map_err(|e| Error::Config(format!("invalid branch pattern '{raw}': {e}")))?;
        Ok(Self {
            raw: raw.to_string(),
            pattern,
        })
    }

    /// The pattern as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a single branch name satisfies the pattern
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches_with(name, MATCH_OPTIONS)
    }
}

impl std::fmt::Display for BranchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Return every name matching `pattern`, in input order
pub fn match_branches<S: AsRef<str>>(names: &[S], pattern: &BranchPattern) -> Vec<String> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| pattern.matches(name))
        .map(ToString::to_string)
        .collect()
}
