//! # Store Builder
//!
//! `StoreBuilder` configures where a `FrecencyStore` keeps its shared segment
//! and its text checkpoint. Unset locations fall back to the well-known
//! defaults in `config::paths`, which every cooperating process resolves the
//! same way.
//!
//! ```ignore
//! let mut store = FrecencyStore::builder()
//!     .segment_path("/dev/shm/editor-frecency.shm")
//!     .data_path(data_dir.join("frecency.txt"))
//!     .open()?;
//! ```

use std::path::{Path, PathBuf};

use eyre::Result;

use super::FrecencyStore;
use crate::config::{default_data_path, default_segment_path};

#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    segment_path: Option<PathBuf>,
    data_path: Option<PathBuf>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing file of the shared segment. Every process that should share
    /// scores must use the same file.
    pub fn segment_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.segment_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Text checkpoint used to seed a fresh segment and written by `save`.
    pub fn data_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds an uninitialized store. Call `init` before use.
    pub fn build(self) -> FrecencyStore {
        FrecencyStore::new(
            self.segment_path.unwrap_or_else(default_segment_path),
            self.data_path.unwrap_or_else(default_data_path),
        )
    }

    /// Builds the store and attaches it, reporting setup failures.
    pub fn open(self) -> Result<FrecencyStore> {
        let mut store = self.build();
        store.try_init()?;
        Ok(store)
    }
}
