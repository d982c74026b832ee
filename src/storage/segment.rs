//! # Shared Segment
//!
//! `SharedSegment` maps the backing file of the entry table read-write and
//! `MAP_SHARED`, so every process that maps the same file sees the same
//! bytes. The table is used in place: reads and writes go straight to the
//! mapping, with no copy.
//!
//! ## Sizing
//!
//! The file is always exactly `TABLE_SIZE` bytes. `attach` creates it if
//! missing and calls `set_len` on every attach, so a file of any other size
//! (for example left behind by an older layout) is brought back to the
//! table size before mapping. The mapping is never grown or remapped while
//! attached, so slot offsets are identical in every process.
//!
//! ## Lifecycle
//!
//! ```text
//! attach(path)   open/create -> set_len(TABLE_SIZE) -> mmap (shared)
//! table_mut()    in-place access, magic tells fresh from reattached
//! sync()         msync the whole mapping
//! drop           munmap, close the descriptor
//! ```
//!
//! ## Safety Considerations
//!
//! Other processes may write to the mapping at any time. Rust references into
//! it are only sound as long as nobody else writes concurrently, which this
//! store does not enforce: mutations from different processes can race. All
//! fields are plain bytes with no invalid bit patterns, so a racing write can
//! produce a stale or mixed record but never an invalid value.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use eyre::{ensure, Result, WrapErr};
use memmap2::MmapMut;

use super::table::EntryTable;
use crate::config::TABLE_SIZE;

#[derive(Debug)]
pub struct SharedSegment {
    path: PathBuf,
    _file: File,
    mmap: MmapMut,
}

impl SharedSegment {
    pub fn attach<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("failed to create segment directory '{}'", parent.display())
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .wrap_err_with(|| format!("failed to open segment file '{}'", path.display()))?;

        let current_len = file
            .metadata()
            .wrap_err_with(|| format!("failed to get metadata for '{}'", path.display()))?
            .len();

        if current_len != TABLE_SIZE as u64 {
            file.set_len(TABLE_SIZE as u64).wrap_err_with(|| {
                format!(
                    "failed to size segment '{}' to {} bytes",
                    path.display(),
                    TABLE_SIZE
                )
            })?;
        }

        // SAFETY: MmapMut::map_mut is unsafe because the file may be modified
        // externally while mapped. Here that is the point: the file is shared
        // with other processes running this store. This is acceptable because:
        // 1. The file was just sized to exactly TABLE_SIZE, so the whole table
        //    view lies inside the mapping
        // 2. Every table field is plain bytes (no invalid bit patterns), so
        //    concurrent external writes can only produce stale data
        // 3. The mapping lifetime is tied to SharedSegment; table references
        //    borrow from it and cannot outlive the unmap
        let mmap = unsafe {
            MmapMut::map_mut(&file)
                .wrap_err_with(|| format!("failed to memory-map '{}'", path.display()))?
        };

        ensure!(
            mmap.len() >= TABLE_SIZE,
            "segment '{}' mapped {} bytes, expected {}",
            path.display(),
            mmap.len(),
            TABLE_SIZE
        );

        Ok(Self {
            path: path.to_path_buf(),
            _file: file,
            mmap,
        })
    }

    pub fn table(&self) -> Result<&EntryTable> {
        EntryTable::from_bytes(&self.mmap)
    }

    pub fn table_mut(&mut self) -> Result<&mut EntryTable> {
        EntryTable::from_bytes_mut(&mut self.mmap)
    }

    pub fn sync(&self) -> Result<()> {
        self.mmap
            .flush()
            .wrap_err_with(|| format!("failed to sync segment '{}'", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }
}
