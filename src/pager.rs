//! The interface the display component consumes.
//!
//! A display loop needs exactly three things from the core: the bytes of a line,
//! whether a line exists (to decide if scrolling can continue), and a per-line
//! match map for highlighting. [`PagerCore`] is that seam; [`Pager`] wires a
//! [`LineReader`] and a [`SearchCoordinator`] behind it.

use crate::config::PagerConfig;
use crate::error::Result;
use crate::file_handler::{ByteSource, FileSource, LineRead, LineReader};
use crate::search::{SearchCoordinator, SearchOptions, SearchResults};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Read, existence and search operations over one opened stream
#[async_trait]
pub trait PagerCore: Send + Sync {
    /// Fill `buf` with up to `buf.len()` bytes of `line`
    async fn read_line(&self, buf: &mut [u8], line: u64) -> Result<LineRead>;

    /// Whether `line` exists
    async fn line_exists(&self, line: u64) -> bool;

    /// Search every line from `from_line` to the end of the stream
    async fn search(&self, pattern: &str, from_line: u64) -> Result<SearchResults>;
}

/// Line reader and search coordinator over a single byte source
#[derive(Debug, Clone)]
pub struct Pager {
    reader: Arc<LineReader>,
    coordinator: SearchCoordinator,
    options: SearchOptions,
}

impl Pager {
    /// Build a pager over `source` with the given tunables
    pub fn new(source: impl ByteSource + 'static, config: &PagerConfig) -> Result<Self> {
        config.validate()?;

        let reader = Arc::new(LineReader::new(source).with_chunk_size(config.scan_chunk_size));
        let coordinator = SearchCoordinator::new(Arc::clone(&reader))
            .with_width(config.search_width)
            .with_error_budget(config.error_budget);

        Ok(Self {
            reader,
            coordinator,
            options: SearchOptions::default(),
        })
    }

    /// Open `path` and build a pager over its contents
    pub fn open(path: &Path, config: &PagerConfig) -> Result<Self> {
        Self::new(FileSource::open(path)?, config)
    }

    /// Options applied to subsequent searches
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn reader(&self) -> &Arc<LineReader> {
        &self.reader
    }

    pub fn coordinator(&self) -> &SearchCoordinator {
        &self.coordinator
    }
}

#[async_trait]
impl PagerCore for Pager {
    async fn read_line(&self, buf: &mut [u8], line: u64) -> Result<LineRead> {
        self.reader.read_line(buf, line)
    }

    async fn line_exists(&self, line: u64) -> bool {
        self.reader.line_exists(line)
    }

    async fn search(&self, pattern: &str, from_line: u64) -> Result<SearchResults> {
        self.coordinator
            .search_with_options(pattern, from_line, &self.options)
            .await
    }
}
