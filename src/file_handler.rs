//! Line-indexed access to a random-access byte stream.
//!
//! This module provides the read path of the pager core: the [`ByteSource`]
//! seam, the incrementally built [`OffsetIndex`], and the [`LineReader`] that
//! resolves line numbers to byte ranges through it.

pub mod line_reader;
pub mod mapped;
pub mod offset_index;
pub mod source;

pub use line_reader::{LineRange, LineRead, LineReader, ReadStatus, DEFAULT_SCAN_CHUNK};
pub use mapped::FileSource;
pub use offset_index::OffsetIndex;
pub use source::ByteSource;
