//! Per-search result set, queryable by line number.

use std::collections::BTreeMap;
use std::ops::Range;

/// How the search of a single line ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The line was read and matched; its ranges may be empty
    Searched,
    /// The line does not exist
    EndOfStream,
    /// The byte source failed while reading the line
    ReadError(String),
}

/// Matches found on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub line: u64,
    /// Half-open byte-column intervals, in line order
    pub ranges: Vec<Range<usize>>,
    pub outcome: SearchOutcome,
}

impl LineMatch {
    pub fn searched(line: u64, ranges: Vec<Range<usize>>) -> Self {
        Self {
            line,
            ranges,
            outcome: SearchOutcome::Searched,
        }
    }

    pub fn end_of_stream(line: u64) -> Self {
        Self {
            line,
            ranges: Vec::new(),
            outcome: SearchOutcome::EndOfStream,
        }
    }

    pub fn read_error(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            ranges: Vec::new(),
            outcome: SearchOutcome::ReadError(message.into()),
        }
    }

    /// True if the line holds at least one non-empty match
    ///
    /// Patterns such as `x*` match the empty string at every column; those
    /// ranges highlight nothing and do not make the line a hit.
    pub fn has_match(&self) -> bool {
        self.ranges.iter().any(|range| !range.is_empty())
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.outcome == SearchOutcome::EndOfStream
    }

    /// True if byte column `column` falls inside any match interval
    pub fn is_highlighted(&self, column: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(&column))
    }
}

/// Results of one search invocation
///
/// Entries are kept in discovery order and indexed by line number. A new search
/// produces a new set; nothing is merged across searches.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pattern: String,
    from_line: u64,
    entries: Vec<LineMatch>,
    by_line: BTreeMap<u64, usize>,
    truncated: bool,
}

impl SearchResults {
    pub(crate) fn new(pattern: impl Into<String>, from_line: u64) -> Self {
        Self {
            pattern: pattern.into(),
            from_line,
            entries: Vec::new(),
            by_line: BTreeMap::new(),
            truncated: false,
        }
    }

    /// Flag the set as stopped before end of stream
    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// Record a line result; a second result for the same line is dropped
    pub(crate) fn push(&mut self, found: LineMatch) {
        if self.by_line.contains_key(&found.line) {
            log::warn!("duplicate search result for line {}", found.line);
            return;
        }
        self.by_line.insert(found.line, self.entries.len());
        self.entries.push(found);
    }

    /// Drop entries past the first line that does not exist
    ///
    /// Lines dispatched after the end of the stream all report end of stream;
    /// only the first of them belongs in the result set.
    pub(crate) fn trim_after_end(&mut self) {
        let Some(end) = self.end_of_stream_line() else {
            return;
        };
        if !self.by_line.keys().any(|&line| line > end) {
            return;
        }

        self.entries.retain(|found| found.line <= end);
        self.by_line = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, found)| (found.line, i))
            .collect();
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn from_line(&self) -> u64 {
        self.from_line
    }

    /// True if the search gave up on read errors before reaching end of stream
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Result for `line`, if that line was searched
    pub fn get(&self, line: u64) -> Option<&LineMatch> {
        self.by_line.get(&line).map(|&i| &self.entries[i])
    }

    /// True if column `column` of `line` is inside a match
    pub fn is_highlighted(&self, line: u64, column: usize) -> bool {
        self.get(line)
            .map_or(false, |found| found.is_highlighted(column))
    }

    /// Entries in the order their searches completed
    pub fn iter(&self) -> impl Iterator<Item = &LineMatch> {
        self.entries.iter()
    }

    /// Entries in ascending line order
    pub fn iter_by_line(&self) -> impl Iterator<Item = &LineMatch> {
        self.by_line.values().map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Line numbers holding at least one match, ascending
    pub fn matched_lines(&self) -> Vec<u64> {
        self.iter_by_line()
            .filter(|found| found.has_match())
            .map(|found| found.line)
            .collect()
    }

    /// First matching line at or after `line`
    pub fn first_match_at_or_after(&self, line: u64) -> Option<u64> {
        self.by_line
            .range(line..)
            .map(|(_, &i)| &self.entries[i])
            .find(|found| found.has_match())
            .map(|found| found.line)
    }

    /// Lowest line that reported end of stream
    pub fn end_of_stream_line(&self) -> Option<u64> {
        self.iter_by_line()
            .find(|found| found.is_end_of_stream())
            .map(|found| found.line)
    }

    /// Number of lines whose read failed
    pub fn read_error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|found| matches!(found.outcome, SearchOutcome::ReadError(_)))
            .count()
    }
}
