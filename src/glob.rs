//! Path matching capability.
//!
//! The store core never compiles patterns itself; watches carry an opaque
//! [`PathMatcher`] and the dispatcher only ever asks it whether an event
//! path matches. [`Glob`] is the stock implementation for in-process
//! callers, [`Any`] matches everything, and closures work for tests and
//! ad-hoc filters.

use crate::errors::Result;

/// Decides whether a watch should observe an event at `path`.
pub trait PathMatcher: Send + Sync + 'static {
    fn matches(&self, path: &str) -> bool;
}

impl<F> PathMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn matches(&self, path: &str) -> bool {
        self(path)
    }
}

/// Matches every path. Used by [`Store::wait`].
///
/// [`Store::wait`]: crate::Store::wait
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl PathMatcher for Any {
    fn matches(&self, _path: &str) -> bool {
        true
    }
}

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob over store paths.
///
/// `*` matches within one path segment, `**` matches across segments, and
/// `?` matches a single character. A pattern without metacharacters
/// matches exactly one path, which is how [`Store::sync_path`] watches a
/// single file.
///
/// [`Store::sync_path`]: crate::Store::sync_path
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: glob::Pattern,
}

impl Glob {
    /// Compiles `pattern`, rejecting malformed globs.
    pub fn compile(pattern: &str) -> Result<Glob> {
        Ok(Glob {
            pattern: glob::Pattern::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl PathMatcher for Glob {
    fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}
