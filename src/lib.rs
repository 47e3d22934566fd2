//! # rlpager - Line-Indexed Pager Core
//!
//! Random access by line number over arbitrarily large byte streams, plus
//! concurrent regex search across their lines, without loading the stream into
//! memory.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`file_handler`] - Byte sources, the offset index and the line reader
//! - [`search`] - Pattern compilation and the windowed search coordinator
//! - [`pager`] - The read/exists/search interface a display component consumes
//! - [`config`] - Tunables, optionally loaded from a TOML file
//!
//! ## Example
//!
//! ```no_run
//! use rlpager::{Pager, PagerConfig, PagerCore};
//!
//! # async fn demo() -> rlpager::Result<()> {
//! let pager = Pager::new(b"Line 1\nLine 2\n".to_vec(), &PagerConfig::default())?;
//! let mut buf = [0u8; 80];
//! let read = pager.read_line(&mut buf, 2).await?;
//! assert_eq!(&buf[..read.len], b"Line 2");
//!
//! let results = pager.search("Line", 1).await?;
//! assert!(results.is_highlighted(1, 0));
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod file_handler;

// Core components
pub mod pager;
pub mod search;

// Re-export commonly used types for convenience
pub use error::{PagerError, Result};

// Public API surface for external usage
pub use config::PagerConfig;
pub use file_handler::{ByteSource, FileSource, LineRead, LineReader, OffsetIndex, ReadStatus};
pub use pager::{Pager, PagerCore};
pub use search::{SearchCoordinator, SearchOptions, SearchResults};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
