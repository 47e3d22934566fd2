//! Sorted line-number to byte-offset cache.
//!
//! The OffsetIndex remembers where every line discovered so far begins. It never
//! holds every line of a file, only the ones a scan has walked past, and it is the
//! anchor store that lets the line reader resume scanning from the nearest known
//! line instead of the start of the file.

use crate::error::{PagerError, Result};
use parking_lot::Mutex;

/// The first line always starts at the first byte
const SEED_LINE: u64 = 1;

/// Sorted unique line numbers with a parallel offset store
///
/// `lines[i]` starts at byte `offsets[i]`. Both vectors are strictly increasing.
#[derive(Debug)]
struct Entries {
    lines: Vec<u64>,
    offsets: Vec<u64>,
}

impl Entries {
    /// Index of `line` if present, or the position it would be inserted at
    fn search(&self, line: u64) -> std::result::Result<usize, usize> {
        self.lines.binary_search(&line)
    }
}

/// Thread-safe, incrementally built map of line number → byte offset
///
/// Every mutation and every read of the key sequence happens under the same
/// exclusive lock, so concurrent search workers can insert while the display
/// path queries anchors.
///
/// # Invariants
/// * `(1, 0)` is always present and cannot be deleted
/// * Entries are unique by line number and increasing in both fields
#[derive(Debug)]
pub struct OffsetIndex {
    entries: Mutex<Entries>,
}

impl OffsetIndex {
    /// Create an index holding only the seed entry `(1, 0)`
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                lines: vec![SEED_LINE],
                offsets: vec![0],
            }),
        }
    }

    /// Insert or overwrite the offset of `line`
    ///
    /// Line 0 does not exist and is ignored. The seed entry keeps offset 0.
    pub fn insert(&self, line: u64, offset: u64) {
        if line == 0 || (line == SEED_LINE && offset != 0) {
            return;
        }

        let mut entries = self.entries.lock();
        let i = match entries.search(line) {
            Ok(i) => {
                entries.offsets[i] = offset;
                i
            }
            Err(i) => {
                entries.lines.insert(i, line);
                entries.offsets.insert(i, offset);
                i
            }
        };

        debug_assert!(
            (i == 0 || entries.offsets[i - 1] < offset)
                && entries.offsets.get(i + 1).map_or(true, |&next| offset < next),
            "offset index lost ordering after inserting line {line} at {offset}"
        );
    }

    /// Find the greatest indexed line number ≤ `line`
    ///
    /// # Returns
    /// * `(found_line, offset)` anchor for a forward scan
    /// * `PagerError::NotFound` if `line` is below the smallest indexed line
    pub fn nearest_less_or_equal(&self, line: u64) -> Result<(u64, u64)> {
        let entries = self.entries.lock();
        let i = match entries.search(line) {
            Ok(i) => i,
            Err(0) => return Err(PagerError::NotFound { line }),
            Err(i) => i - 1,
        };
        Ok((entries.lines[i], entries.offsets[i]))
    }

    /// Exact lookup of a cached line
    pub fn get(&self, line: u64) -> Option<u64> {
        let entries = self.entries.lock();
        entries.search(line).ok().map(|i| entries.offsets[i])
    }

    /// Remove `line` from the index
    ///
    /// Returns true if an entry was removed. The seed line is never removed.
    pub fn delete(&self, line: u64) -> bool {
        if line == SEED_LINE {
            return false;
        }

        let mut entries = self.entries.lock();
        match entries.search(line) {
            Ok(i) => {
                entries.lines.remove(i);
                entries.offsets.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of cached lines (always at least one)
    pub fn len(&self) -> usize {
        self.entries.lock().lines.len()
    }

    /// Always false; the seed entry cannot be removed
    pub fn is_empty(&self) -> bool {
        self.entries.lock().lines.is_empty()
    }

    /// Copy of every `(line, offset)` entry in ascending order
    pub fn snapshot(&self) -> Vec<(u64, u64)> {
        let entries = self.entries.lock();
        entries
            .lines
            .iter()
            .copied()
            .zip(entries.offsets.iter().copied())
            .collect()
    }
}

impl Default for OffsetIndex {
    fn default() -> Self {
        Self::new()
    }
}
