//! Windowed, concurrent line search.
//!
//! The coordinator keeps a fixed number of per-line search tasks in flight. Each
//! completed line that exists frees a slot for the next line; the first line that
//! turns out not to exist stops dispatching, and the tasks already in flight are
//! drained before the results are returned. No task is ever cancelled.

use crate::error::{PagerError, Result};
use crate::file_handler::LineReader;
use crate::search::matcher::{LineMatcher, SearchOptions};
use crate::search::results::{LineMatch, SearchOutcome, SearchResults};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Default number of line searches kept in flight
pub const DEFAULT_SEARCH_WIDTH: usize = 5;

/// Default number of failed line reads after which a search stops dispatching
pub const DEFAULT_ERROR_BUDGET: usize = 64;

/// Fans per-line search work out over a shared [`LineReader`]
#[derive(Debug, Clone)]
pub struct SearchCoordinator {
    reader: Arc<LineReader>,
    width: usize,
    error_budget: usize,
}

impl SearchCoordinator {
    pub fn new(reader: Arc<LineReader>) -> Self {
        Self {
            reader,
            width: DEFAULT_SEARCH_WIDTH,
            error_budget: DEFAULT_ERROR_BUDGET,
        }
    }

    /// Set the number of concurrent line searches (at least one)
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Set how many per-line read failures end dispatching (at least one)
    pub fn with_error_budget(mut self, error_budget: usize) -> Self {
        self.error_budget = error_budget.max(1);
        self
    }

    /// Search every line from `from_line` to the end of the stream
    ///
    /// # Errors
    /// * `CompileError` if `pattern` is invalid; no line is read in that case
    /// * `SearchError` if a line task panicked
    pub async fn search(&self, pattern: &str, from_line: u64) -> Result<SearchResults> {
        self.search_with_options(pattern, from_line, &SearchOptions::default())
            .await
    }

    /// Same as [`search`](Self::search) with explicit compile options
    pub async fn search_with_options(
        &self,
        pattern: &str,
        from_line: u64,
        options: &SearchOptions,
    ) -> Result<SearchResults> {
        let matcher = Arc::new(LineMatcher::with_options(pattern, options)?);

        // Line numbers start at 1
        let first_line = from_line.max(1);
        let mut results = SearchResults::new(matcher.pattern(), first_line);
        let mut tasks = JoinSet::new();
        // None once the line counter would pass u64::MAX
        let mut next_line = Some(first_line);

        for _ in 0..self.width {
            let Some(line) = next_line else { break };
            self.dispatch(&mut tasks, &matcher, line);
            next_line = line.checked_add(1);
        }

        let mut dispatching = true;
        let mut read_errors = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let found = joined
                .map_err(|e| PagerError::search(format!("line search task failed: {e}")))?;

            match &found.outcome {
                SearchOutcome::EndOfStream => {
                    if dispatching {
                        log::debug!(
                            "end of stream at line {}, draining {} in-flight searches",
                            found.line,
                            tasks.len()
                        );
                    }
                    dispatching = false;
                }
                SearchOutcome::ReadError(message) => {
                    log::warn!("search could not read line {}: {message}", found.line);
                    read_errors += 1;
                    if dispatching && read_errors >= self.error_budget {
                        log::warn!(
                            "{read_errors} line reads failed, stopping search after line {}",
                            found.line
                        );
                        results.mark_truncated();
                        dispatching = false;
                    }
                }
                SearchOutcome::Searched => {}
            }

            if dispatching {
                match next_line {
                    Some(line) => {
                        self.dispatch(&mut tasks, &matcher, line);
                        next_line = line.checked_add(1);
                    }
                    None => dispatching = false,
                }
            }

            results.push(found);
        }

        results.trim_after_end();
        log::debug!(
            "search for '{pattern}' covered {} lines from line {first_line}, {} matched",
            results.len(),
            results.matched_lines().len()
        );
        Ok(results)
    }

    fn dispatch(&self, tasks: &mut JoinSet<LineMatch>, matcher: &Arc<LineMatcher>, line: u64) {
        let reader = Arc::clone(&self.reader);
        let matcher = Arc::clone(matcher);
        tasks.spawn_blocking(move || search_line(&reader, &matcher, line));
    }
}

/// Read one line and collect its matches; never fails, the outcome records errors
fn search_line(reader: &LineReader, matcher: &LineMatcher, line: u64) -> LineMatch {
    let content = match reader.read_full_line(line) {
        Ok(content) => content,
        Err(e) if e.is_end_of_stream() => return LineMatch::end_of_stream(line),
        Err(e) => return LineMatch::read_error(line, e.to_string()),
    };

    match matcher.find_ranges(&content) {
        Ok(ranges) => LineMatch::searched(line, ranges),
        Err(e) => LineMatch::read_error(line, e.to_string()),
    }
}
