//! Line-addressed reads over a random-access byte source.
//!
//! The LineReader resolves a line number to a byte range by starting from the
//! nearest line already recorded in its [`OffsetIndex`] and scanning forward only
//! as far as needed. Every newline it walks past is recorded, so resolving line N
//! costs the distance from the nearest previously visited line rather than a scan
//! from the start of the file.

use crate::error::{PagerError, Result};
use crate::file_handler::offset_index::OffsetIndex;
use crate::file_handler::source::ByteSource;
use memchr::memchr_iter;
use std::sync::Arc;

/// Default number of bytes read per forward-scan step
pub const DEFAULT_SCAN_CHUNK: usize = 128;

/// Byte span of one line's content
///
/// `start` is the offset of the line's first byte. `end` is the offset of the
/// terminating newline, or `None` when the stream ends before a newline is found
/// (an open-ended line whose length is unknown without reading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl LineRange {
    /// Content length in bytes, if the line is closed
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end - self.start)
    }

    /// True for an open-ended line
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Whether a read filled the caller's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// Every byte of the buffer holds line content
    Full,
    /// Fewer bytes than the buffer size were meaningful; the rest is untouched
    Short,
}

/// Outcome of a successful [`LineReader::read_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRead {
    /// Number of bytes written to the front of the buffer
    pub len: usize,
    pub status: ReadStatus,
}

impl LineRead {
    pub fn is_short(&self) -> bool {
        self.status == ReadStatus::Short
    }
}

/// Line-indexed reader over a [`ByteSource`]
///
/// Safe to share between the display path and concurrent search workers: the
/// reader holds no lock of its own, and index updates serialize inside the
/// [`OffsetIndex`].
pub struct LineReader {
    source: Box<dyn ByteSource>,
    index: Arc<OffsetIndex>,
    chunk_size: usize,
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("indexed_lines", &self.index.len())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl LineReader {
    /// Create a reader with a fresh index and the default scan chunk
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::with_index(source, Arc::new(OffsetIndex::new()))
    }

    /// Create a reader around an existing, shared offset index
    pub fn with_index(source: impl ByteSource + 'static, index: Arc<OffsetIndex>) -> Self {
        Self {
            source: Box::new(source),
            index,
            chunk_size: DEFAULT_SCAN_CHUNK,
        }
    }

    /// Override the forward-scan chunk size (clamped to at least one byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Shared handle to the offset index
    pub fn index(&self) -> &Arc<OffsetIndex> {
        &self.index
    }

    /// Byte offset of the first byte of `line`
    ///
    /// # Errors
    /// * `EndOfStream` if the source ends before `line` begins, including the
    ///   line that would start right after a trailing newline
    /// * `ReadError` if the source fails
    /// * `NotFound` for line 0
    pub fn find_line(&self, line: u64) -> Result<u64> {
        let offset = self.locate(line)?;

        // A newline at the very end of the stream does not open another line.
        let mut next_byte = [0u8; 1];
        let n = self
            .source
            .read_at(&mut next_byte, offset)
            .map_err(|e| PagerError::read_error(offset, e))?;
        if n == 0 {
            return Err(PagerError::EndOfStream);
        }

        Ok(offset)
    }

    /// True iff `line` exists in the stream
    pub fn line_exists(&self, line: u64) -> bool {
        self.find_line(line).is_ok()
    }

    /// Byte range of `line`'s content, excluding its newline
    pub fn line_range(&self, line: u64) -> Result<LineRange> {
        let start = self.find_line(line)?;
        let Some(next_line) = line.checked_add(1) else {
            return Ok(LineRange { start, end: None });
        };
        let end = match self.locate(next_line) {
            Ok(next_start) => Some(next_start - 1),
            Err(e) if e.is_end_of_stream() => None,
            Err(e) => return Err(e),
        };
        Ok(LineRange { start, end })
    }

    /// Read up to `buf.len()` bytes of `line`'s content into `buf`
    ///
    /// # Returns
    /// * `ReadStatus::Full` when the whole buffer holds line content
    /// * `ReadStatus::Short` when the line (or the stream) ended first; only
    ///   the first `len` bytes of `buf` were written
    ///
    /// # Errors
    /// * `EndOfStream` when `line` does not exist
    /// * `ReadError` on source failure; the read is not retried
    pub fn read_line(&self, buf: &mut [u8], line: u64) -> Result<LineRead> {
        let range = self.line_range(line)?;

        let mut wanted = buf.len();
        let mut shrunk = false;
        if let Some(size) = range.len() {
            if size < wanted as u64 {
                // Lossless: size < wanted, which is a usize
                wanted = size as usize;
                shrunk = true;
            }
        }

        let n = self
            .source
            .read_at(&mut buf[..wanted], range.start)
            .map_err(|e| PagerError::read_error(range.start, e))?;

        let status = if shrunk || n < buf.len() {
            ReadStatus::Short
        } else {
            ReadStatus::Full
        };
        Ok(LineRead { len: n, status })
    }

    /// Entire content of `line`, however long
    ///
    /// Closed lines are read in one request; open-ended lines are read in
    /// growing chunks until the source runs out.
    pub fn read_full_line(&self, line: u64) -> Result<Vec<u8>> {
        let range = self.line_range(line)?;

        if let Some(size) = range.len() {
            let size = usize::try_from(size).map_err(|_| {
                PagerError::invalid_argument(format!("line {line} does not fit in memory"))
            })?;
            let mut content = vec![0u8; size];
            let n = self
                .source
                .read_at(&mut content, range.start)
                .map_err(|e| PagerError::read_error(range.start, e))?;
            content.truncate(n);
            return Ok(content);
        }

        let mut content = Vec::new();
        let mut chunk = vec![0u8; self.chunk_size.max(DEFAULT_SCAN_CHUNK)];
        let mut offset = range.start;
        loop {
            let n = self
                .source
                .read_at(&mut chunk, offset)
                .map_err(|e| PagerError::read_error(offset, e))?;
            content.extend_from_slice(&chunk[..n]);
            if n < chunk.len() {
                return Ok(content);
            }
            offset += n as u64;
            if chunk.len() < 64 * 1024 {
                chunk.resize(chunk.len() * 2, 0);
            }
        }
    }

    /// Offset at which `line` would begin, scanning forward from the nearest anchor
    ///
    /// Unlike [`find_line`](Self::find_line) this succeeds for the position just
    /// past a trailing newline; callers use it to find where the previous line ends.
    fn locate(&self, line: u64) -> Result<u64> {
        let (anchor_line, anchor_offset) = self.index.nearest_less_or_equal(line)?;
        if anchor_line == line {
            return Ok(anchor_offset);
        }
        self.scan_for_line(line, anchor_line, anchor_offset)
    }

    /// Walk forward from `cur_offset` (the start of `cur_line`) to the start of `line`
    fn scan_for_line(&self, line: u64, mut cur_line: u64, mut cur_offset: u64) -> Result<u64> {
        log::trace!("scanning for line {line} from line {cur_line} at byte {cur_offset}");

        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            let n = self
                .source
                .read_at(&mut chunk, cur_offset)
                .map_err(|e| PagerError::read_error(cur_offset, e))?;
            if n == 0 {
                return Err(PagerError::EndOfStream);
            }

            for pos in memchr_iter(b'\n', &chunk[..n]) {
                let offset = cur_offset + pos as u64 + 1;
                cur_line += 1;
                self.index.insert(cur_line, offset);

                if cur_line == line {
                    return Ok(offset);
                }
            }

            cur_offset += n as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_LINES: &[u8] = b"Line 1\nLine 2\nLine 3\n";

    fn reader(data: &[u8]) -> LineReader {
        LineReader::new(data.to_vec())
    }

    fn read_string(reader: &LineReader, line: u64, buf_size: usize) -> (String, LineRead) {
        let mut buf = vec![0u8; buf_size];
        let read = reader.read_line(&mut buf, line).unwrap();
        (String::from_utf8_lossy(&buf[..read.len]).into_owned(), read)
    }

    #[test]
    fn test_find_line_populates_index() {
        let reader = reader(THREE_LINES);
        assert_eq!(reader.find_line(3).unwrap(), 14);
        assert_eq!(reader.index().snapshot(), vec![(1, 0), (2, 7), (3, 14)]);
    }

    #[test]
    fn test_find_line_reuses_anchor() {
        let reader = reader(THREE_LINES);
        reader.find_line(2).unwrap();
        assert_eq!(reader.index().len(), 2);
        assert_eq!(reader.find_line(2).unwrap(), 7);
        assert_eq!(reader.find_line(3).unwrap(), 14);
    }

    #[test]
    fn test_line_after_trailing_newline_does_not_exist() {
        let reader = reader(THREE_LINES);
        assert!(reader.line_exists(3));
        assert!(!reader.line_exists(4));
        assert!(matches!(reader.find_line(4), Err(PagerError::EndOfStream)));
        assert!(matches!(reader.find_line(10), Err(PagerError::EndOfStream)));
    }

    #[test]
    fn test_last_line_number_is_end_of_stream() {
        let reader = reader(THREE_LINES);
        assert!(!reader.line_exists(u64::MAX));
        assert!(matches!(
            reader.line_range(u64::MAX),
            Err(PagerError::EndOfStream)
        ));
        let mut buf = [0u8; 8];
        assert!(matches!(
            reader.read_line(&mut buf, u64::MAX),
            Err(PagerError::EndOfStream)
        ));
    }

    #[test]
    fn test_line_zero_is_not_found() {
        let reader = reader(THREE_LINES);
        assert!(matches!(
            reader.find_line(0),
            Err(PagerError::NotFound { line: 0 })
        ));
        assert!(!reader.line_exists(0));
    }

    #[test]
    fn test_line_range_closed_and_open() {
        let reader = reader(b"first\nsecond");
        assert_eq!(
            reader.line_range(1).unwrap(),
            LineRange {
                start: 0,
                end: Some(5)
            }
        );
        let last = reader.line_range(2).unwrap();
        assert_eq!(last.start, 6);
        assert!(last.is_open());
        assert_eq!(last.len(), None);
    }

    #[test]
    fn test_read_line_short_and_full() {
        let reader = reader(THREE_LINES);

        let (text, read) = read_string(&reader, 1, 128);
        assert_eq!(text, "Line 1");
        assert!(read.is_short());

        let (text, read) = read_string(&reader, 1, 4);
        assert_eq!(text, "Line");
        assert_eq!(read.status, ReadStatus::Full);

        // Exact size
        let (text, read) = read_string(&reader, 1, 6);
        assert_eq!(text, "Line 1");
        assert_eq!(read.status, ReadStatus::Full);
    }

    #[test]
    fn test_read_line_leaves_rest_of_buffer_untouched() {
        let reader = reader(THREE_LINES);
        let mut buf = [b'#'; 10];
        let read = reader.read_line(&mut buf, 2).unwrap();
        assert_eq!(read.len, 6);
        assert_eq!(&buf, b"Line 2####");
    }

    #[test]
    fn test_read_empty_line() {
        let reader = reader(b"A\n\nB\n");
        let (text, read) = read_string(&reader, 2, 16);
        assert_eq!(text, "");
        assert_eq!(read.len, 0);
        assert!(read.is_short());

        let (text, _) = read_string(&reader, 3, 16);
        assert_eq!(text, "B");
    }

    #[test]
    fn test_read_open_ended_line() {
        let reader = reader(b"Hello World!");
        let (text, read) = read_string(&reader, 1, 128);
        assert_eq!(text, "Hello World!");
        assert!(read.is_short());

        let mut buf = [0u8; 128];
        assert!(matches!(
            reader.read_line(&mut buf, 2),
            Err(PagerError::EndOfStream)
        ));
    }

    #[test]
    fn test_read_after_long_line() {
        let mut data = b"Line 1\nLine 2\nLine 3\nLine 4\nLine 5\n\nLine 7\n".to_vec();
        data.extend(std::iter::repeat(b'a').take(600));
        data.extend_from_slice(b"\nLine 9");
        let reader = reader(&data);

        // Skip ahead before reading earlier lines
        assert_eq!(read_string(&reader, 5, 128).0, "Line 5");
        assert_eq!(read_string(&reader, 2, 128).0, "Line 2");
        assert_eq!(read_string(&reader, 6, 128).0, "");
        assert_eq!(read_string(&reader, 7, 128).0, "Line 7");
        assert_eq!(read_string(&reader, 9, 128).0, "Line 9");

        let (long, read) = read_string(&reader, 8, 128);
        assert_eq!(long.len(), 128);
        assert_eq!(read.status, ReadStatus::Full);
    }

    #[test]
    fn test_read_full_line() {
        let mut data = vec![b'x'; 1000];
        data.push(b'\n');
        data.extend(std::iter::repeat(b'y').take(700));
        let reader = reader(&data);

        assert_eq!(reader.read_full_line(1).unwrap(), vec![b'x'; 1000]);
        assert_eq!(reader.read_full_line(2).unwrap(), vec![b'y'; 700]);
        assert!(matches!(
            reader.read_full_line(3),
            Err(PagerError::EndOfStream)
        ));
    }

    #[test]
    fn test_empty_source_has_no_lines() {
        let reader = reader(b"");
        assert!(!reader.line_exists(1));
        let mut buf = [0u8; 8];
        assert!(matches!(
            reader.read_line(&mut buf, 1),
            Err(PagerError::EndOfStream)
        ));
    }

    #[test]
    fn test_small_chunk_size() {
        let reader = LineReader::new(THREE_LINES.to_vec()).with_chunk_size(1);
        assert_eq!(reader.find_line(3).unwrap(), 14);
        assert_eq!(read_string(&reader, 2, 64).0, "Line 2");
    }

    #[test]
    fn test_shared_index() {
        let index = Arc::new(OffsetIndex::new());
        let first = LineReader::with_index(THREE_LINES.to_vec(), Arc::clone(&index));
        first.find_line(3).unwrap();

        let second = LineReader::with_index(THREE_LINES.to_vec(), Arc::clone(&index));
        assert_eq!(second.index().get(3), Some(14));
    }

    struct FailingSource;

    impl ByteSource for FailingSource {
        fn read_at(&self, _buf: &mut [u8], _offset: u64) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "device lost"))
        }
    }

    #[test]
    fn test_source_failure_is_read_error() {
        let reader = LineReader::new(FailingSource);
        let mut buf = [0u8; 8];
        match reader.read_line(&mut buf, 1) {
            Err(PagerError::ReadError { offset, .. }) => assert_eq!(offset, 0),
            other => panic!("expected ReadError, got {other:?}"),
        }
        assert!(!reader.line_exists(1));
    }
}
