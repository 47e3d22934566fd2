//! File-backed byte source.
//!
//! Small files are loaded into memory, larger ones are memory-mapped. Either way
//! the bytes reach the line reader through the [`ByteSource`] trait.

use crate::error::{PagerError, Result};
use crate::file_handler::source::ByteSource;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Storage strategy for an opened file
#[derive(Debug)]
enum Storage {
    /// Content loaded entirely into memory (files below the threshold, and empty files)
    InMemory(Vec<u8>),
    /// Content accessed via memory mapping
    MemoryMapped(Mmap),
}

/// A file opened for line-indexed reading
///
/// # Strategy Selection
/// - Files < 50MB: read into memory
/// - Files ≥ 50MB: memory mapped
#[derive(Debug)]
pub struct FileSource {
    storage: Storage,
    path: PathBuf,
}

impl FileSource {
    /// Size threshold for choosing between in-memory and memory-mapped storage
    pub const MEMORY_THRESHOLD: u64 = 50 * 1024 * 1024; // 50MB

    /// Anything larger is refused as a likely device or mistaken path
    pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024 * 1024; // 100GB

    /// Open `path` with the storage strategy suited to its size
    ///
    /// Directories and files above [`Self::MAX_FILE_SIZE`] are rejected with
    /// `FileError`. Empty files open fine and hold no lines.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PagerError::file_error(format!("Failed to open file: {}", path.display()), e)
        })?;
        let metadata = file
            .metadata()
            .map_err(|e| PagerError::file_error("Failed to get file metadata", e))?;

        if !metadata.is_file() {
            return Err(PagerError::file_error(
                format!("Not a regular file: {}", path.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let file_size = metadata.len();
        if file_size > Self::MAX_FILE_SIZE {
            return Err(PagerError::file_error(
                format!(
                    "File too large ({}GB): {}",
                    file_size / (1024 * 1024 * 1024),
                    path.display()
                ),
                io::Error::new(io::ErrorKind::InvalidData, "file too large"),
            ));
        }

        let storage = if file_size < Self::MEMORY_THRESHOLD {
            let mut content = Vec::with_capacity(file_size as usize);
            let mut file = file;
            file.read_to_end(&mut content)
                .map_err(|e| PagerError::file_error("Failed to read file", e))?;
            Storage::InMemory(content)
        } else {
            // SAFETY: the map is read-only; concurrent truncation by another
            // process is outside what a pager can defend against.
            let mmap = unsafe {
                Mmap::map(&file).map_err(|e| {
                    PagerError::file_error(
                        format!("Failed to memory map file: {}", path.display()),
                        e,
                    )
                })?
            };

            // Line lookups jump around the file
            #[cfg(unix)]
            {
                if let Err(e) = mmap.advise(memmap2::Advice::Random) {
                    // Non-fatal
                    log::warn!("Failed to set mmap advice: {e}");
                }
            }

            Storage::MemoryMapped(mmap)
        };

        log::debug!(
            "opened {} ({} bytes, {})",
            path.display(),
            file_size,
            if matches!(storage, Storage::InMemory(_)) {
                "in memory"
            } else {
                "memory mapped"
            }
        );

        Ok(Self {
            storage,
            path: path.to_path_buf(),
        })
    }

    /// Size of the content in bytes
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Path the source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file is memory mapped rather than loaded
    pub fn is_memory_mapped(&self) -> bool {
        matches!(self.storage, Storage::MemoryMapped(_))
    }

    fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::InMemory(content) => content,
            Storage::MemoryMapped(mmap) => &mmap[..],
        }
    }
}

impl ByteSource for FileSource {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.as_bytes().read_at(buf, offset)
    }
}
