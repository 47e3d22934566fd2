//! Pattern compilation and per-line matching backed by ripgrep's regex matcher.

use crate::error::{PagerError, Result};
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use std::ops::Range;

/// Options applied when compiling a search pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match letters regardless of case
    pub case_insensitive: bool,
    /// Only match on word boundaries
    pub whole_word: bool,
}

/// A compiled search pattern
///
/// Compiled once per search and shared read-only between all line workers.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    pattern: String,
    matcher: RegexMatcher,
}

impl LineMatcher {
    /// Compile `pattern` with default options
    pub fn compile(pattern: &str) -> Result<Self> {
        Self::with_options(pattern, &SearchOptions::default())
    }

    /// Compile `pattern`, failing with `CompileError` if it is not a valid regex
    pub fn with_options(pattern: &str, options: &SearchOptions) -> Result<Self> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(options.case_insensitive)
            .word(options.whole_word)
            .build(pattern)
            .map_err(|e| PagerError::compile(pattern, e))?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// Source text the matcher was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Every match in `line` as half-open byte-column intervals, in order
    pub fn find_ranges(&self, line: &[u8]) -> Result<Vec<Range<usize>>> {
        let mut ranges = Vec::new();
        self.matcher
            .find_iter(line, |m| {
                ranges.push(m.start()..m.end());
                true
            })
            .map_err(|e| PagerError::search(e.to_string()))?;
        Ok(ranges)
    }
}
