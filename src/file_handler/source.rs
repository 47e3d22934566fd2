//! Random-access byte source abstraction.
//!
//! The line reader consumes its input through a single capability: read up to
//! `buf.len()` bytes starting at an arbitrary offset. Returning fewer bytes than
//! requested signals end of stream. No cursor, write or truncate support is needed.

use memmap2::Mmap;
use std::io;

/// Positional, thread-safe byte source.
///
/// Implementations must be safe to call concurrently from several search
/// workers and the foreground display path.
pub trait ByteSource: Send + Sync {
    /// Read up to `buf.len()` bytes starting at `offset`
    ///
    /// # Returns
    /// * `Ok(n)` with `n == buf.len()` when enough data exists
    /// * `Ok(n)` with `n < buf.len()` at end of stream (including `n == 0`
    ///   when `offset` is at or past the end)
    /// * `Err` only for genuine I/O failures
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

/// Copy from an in-memory slice, clamping to the available bytes
fn read_slice_at(data: &[u8], buf: &mut [u8], offset: u64) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    if start >= data.len() {
        return 0;
    }
    let n = buf.len().min(data.len() - start);
    buf[..n].copy_from_slice(&data[start..start + n]);
    n
}

impl ByteSource for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(read_slice_at(self, buf, offset))
    }
}

impl ByteSource for Vec<u8> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(read_slice_at(self, buf, offset))
    }
}

impl ByteSource for &'static [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(read_slice_at(self, buf, offset))
    }
}

impl ByteSource for Mmap {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(read_slice_at(&self[..], buf, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_within_bounds() {
        let data = b"hello world".to_vec();
        let mut buf = [0u8; 5];
        assert_eq!(data.read_at(&mut buf, 6).unwrap(), 5);
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn test_short_read_at_end() {
        let data = b"hello".to_vec();
        let mut buf = [0u8; 8];
        assert_eq!(data.read_at(&mut buf, 3).unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");
    }

    #[test]
    fn test_read_past_end_returns_zero() {
        let data: &'static [u8] = b"abc";
        let mut buf = [0u8; 4];
        assert_eq!(data.read_at(&mut buf, 3).unwrap(), 0);
        assert_eq!(data.read_at(&mut buf, 1000).unwrap(), 0);
        assert_eq!(data.read_at(&mut buf, u64::MAX).unwrap(), 0);
    }

    #[test]
    fn test_empty_buffer() {
        let data = b"abc".to_vec();
        let mut buf = [0u8; 0];
        assert_eq!(data.read_at(&mut buf, 0).unwrap(), 0);
    }
}
