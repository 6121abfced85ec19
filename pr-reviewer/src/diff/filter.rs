//! Glob-style path selection over a parsed diff document.
//!
//! Patterns use `*` for any character run within one path segment (it never
//! crosses `/`) and are case-sensitive. A pattern containing `/` is matched
//! against the full repo-relative path; a pattern without `/` is matched
//! against the final segment, so `*.py` selects nested sources as well.
//! Matching is a logical OR across patterns; an empty result is a valid
//! outcome, not an error.

use regex::Regex;

use crate::diff::DiffDocument;
use crate::errors::{ConfigError, PrResult};

/// A glob pattern table compiled once and passed by reference. Holds no
/// mutable state, so it is freely shared across concurrent review tasks.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: Regex,
    basename_only: bool,
}

impl PatternSet {
    /// Compiles the glob patterns into anchored regexes.
    pub fn compile<S: AsRef<str>>(globs: &[S]) -> PrResult<Self> {
        let mut patterns = Vec::with_capacity(globs.len());
        for glob in globs {
            let glob = glob.as_ref();
            let regex = Regex::new(&glob_to_regex(glob))
                .map_err(|_| ConfigError::InvalidPattern(glob.to_string()))?;
            patterns.push(CompiledPattern {
                regex,
                basename_only: !glob.contains('/'),
            });
        }
        Ok(Self { patterns })
    }

    /// True when the path matches at least one pattern.
    pub fn matches(&self, path: &str) -> bool {
        let basename = path.rsplit('/').next().unwrap_or(path);
        self.patterns.iter().any(|p| {
            if p.basename_only {
                p.regex.is_match(basename)
            } else {
                p.regex.is_match(path)
            }
        })
    }
}

impl DiffDocument {
    /// Returns the sub-document of files whose path matches the set.
    /// Deterministic by construction: the result is itself a path mapping.
    pub fn select(&self, set: &PatternSet) -> DiffDocument {
        DiffDocument {
            files: self
                .files
                .iter()
                .filter(|(path, _)| set.matches(path))
                .map(|(path, file)| (path.clone(), file.clone()))
                .collect(),
            failures: Vec::new(),
        }
    }
}

/// Translates one glob into an anchored regex. `*` becomes `[^/]*`, `?`
/// becomes `[^/]`, everything else is escaped literally.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out.push('$');
    out
}
