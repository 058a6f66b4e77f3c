//! Glob matching of changed paths against a repository's file patterns.
//!
//! Patterns follow shell-glob semantics: `*` and `?` never cross a `/`,
//! `**` spans any number of directories, and `[...]` is a character class.
//! So `*.md` matches `README.md` but not `docs/README.md`.
//!
//! Wildcards never match a leading dot. A path component such as `.github`
//! or `.env` only matches a pattern segment that itself starts with `.`, so
//! `**/*.yml` skips `.github/workflows/ci.yml` while `.github/**` matches it.

use globset::{Glob, GlobBuilder, GlobMatcher};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::types::FileChangeSet;

/// Label reported as the matched pattern when no patterns are configured.
pub const WILDCARD_PATTERN: &str = "*";

/// Error returned when a configured pattern is not a valid glob.
#[derive(Debug, Error)]
#[error("invalid file pattern {pattern:?}: {source}")]
pub struct InvalidPattern {
    pub pattern: String,
    #[source]
    pub source: globset::Error,
}

/// A compiled glob pattern, keeping the text it was compiled from.
///
/// Deserializes from either a bare string or `{ pattern: "..." }`.
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawFilePattern")]
pub struct FilePattern {
    source: String,
    matcher: GlobMatcher,
    /// Segments of the pattern that spell out a leading dot.
    dot_segments: Vec<GlobMatcher>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilePattern {
    Bare(String),
    Object { pattern: String },
}

impl TryFrom<RawFilePattern> for FilePattern {
    type Error = InvalidPattern;

    fn try_from(raw: RawFilePattern) -> Result<Self, Self::Error> {
        match raw {
            RawFilePattern::Bare(pattern) | RawFilePattern::Object { pattern } => {
                FilePattern::new(pattern)
            }
        }
    }
}

impl FilePattern {
    /// Compiles a glob pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, InvalidPattern> {
        let source = pattern.into();
        let glob = build_glob(&source).map_err(|e| InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;

        // A segment that does not compile on its own (a brace group split by
        // `/`) cannot admit a dotted component.
        let dot_segments = source
            .split('/')
            .filter(|segment| segment.starts_with('.'))
            .filter_map(|segment| build_glob(segment).ok())
            .map(|glob| glob.compile_matcher())
            .collect();

        Ok(FilePattern {
            matcher: glob.compile_matcher(),
            dot_segments,
            source,
        })
    }

    /// The pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
            && path
                .split('/')
                .filter(|component| component.starts_with('.'))
                .all(|component| self.dot_segments.iter().any(|m| m.is_match(component)))
    }
}

fn build_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

impl fmt::Debug for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilePattern").field(&self.source).finish()
    }
}

impl PartialEq for FilePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FilePattern {}

/// Outcome of matching a change set against a pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// True iff at least one file matched (always true with no patterns).
    pub matched: bool,

    /// Distinct patterns that matched something, in order of first match.
    pub matched_patterns: Vec<String>,

    /// The matching files, each kept in its original category.
    pub files: FileChangeSet,
}

/// Matches every changed path against every pattern.
///
/// With an empty pattern list everything matches: the result carries the
/// [`WILDCARD_PATTERN`] label and the input set unfiltered.
pub fn match_patterns(changes: &FileChangeSet, patterns: &[FilePattern]) -> PatternMatch {
    if patterns.is_empty() {
        return PatternMatch {
            matched: true,
            matched_patterns: vec![WILDCARD_PATTERN.to_string()],
            files: changes.clone(),
        };
    }

    let mut matched_patterns: Vec<String> = Vec::new();
    let mut files = FileChangeSet::new();

    for pattern in patterns {
        for (kind, path) in changes.iter() {
            if !pattern.is_match(path) {
                continue;
            }
            if !matched_patterns.iter().any(|p| p == pattern.as_str()) {
                matched_patterns.push(pattern.as_str().to_string());
            }
            files.insert(kind, path);
        }
    }

    PatternMatch {
        matched: !files.is_empty(),
        matched_patterns,
        files,
    }
}
