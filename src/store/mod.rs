//! # Frecency Store
//!
//! `FrecencyStore` is the surface host integrations call: buffer events call
//! `visit`, pickers call `list` and `get`, a timer calls `save`, and the host
//! calls `shutdown` on exit.
//!
//! ## Lifecycle
//!
//! ```text
//! build() ──init()──> attached ──shutdown()──> detached
//!                       │  ▲
//!                       │  └── init() again is a no-op returning true
//!                       │
//!   visit/get/del/list/sync/save operate on the mapped table
//! ```
//!
//! On `init` the segment is attached. If its header lacks the magic, this is
//! the first process to use it since it was created (or since the machine
//! booted, for a tmpfs segment): the table is reset and seeded from the text
//! checkpoint. Otherwise the live table left by other processes is used as is.
//!
//! ## Failure Policy
//!
//! Frecency is a best-effort ranking hint, so nothing here fails loudly:
//!
//! | Situation                  | Behavior                                  |
//! |----------------------------|-------------------------------------------|
//! | not initialized            | reads return 0 / empty, writes do nothing |
//! | `init` cannot map segment  | logs a warning, returns `false`           |
//! | checkpoint unreadable      | logs a warning, starts empty              |
//! | checkpoint write fails     | logs at debug, mapped table unaffected    |
//!
//! `try_init` and `StoreBuilder::open` expose the underlying error for hosts
//! that want to report it themselves.
//!
//! ## Time
//!
//! Scores depend on the current time. Each time-dependent operation has an
//! `_at` variant taking seconds since the Unix epoch; the plain variants use
//! the wall clock.

mod builder;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use eyre::Result;

use crate::config::DEFAULT_VISIT_VALUE;
use crate::persistence;
use crate::score;
use crate::storage::{EntryTable, SharedSegment};

pub use builder::StoreBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    NotInitialized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    pub path: Vec<u8>,
    pub score: f64,
}

impl ScoredPath {
    pub fn path_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }
}

#[derive(Debug)]
pub struct FrecencyStore {
    segment_path: PathBuf,
    data_path: PathBuf,
    segment: Option<SharedSegment>,
}

impl FrecencyStore {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn new(segment_path: PathBuf, data_path: PathBuf) -> Self {
        Self {
            segment_path,
            data_path,
            segment: None,
        }
    }

    pub fn segment_path(&self) -> &Path {
        &self.segment_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn is_initialized(&self) -> bool {
        self.segment.is_some()
    }

    /// Attaches the shared segment, seeding it from the checkpoint when this
    /// process is the first to claim it. Returns `false` (and logs) on
    /// failure; the store then stays inert.
    pub fn init(&mut self) -> bool {
        match self.try_init() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    segment = %self.segment_path.display(),
                    error = ?e,
                    "frecency store unavailable"
                );
                false
            }
        }
    }

    pub fn try_init(&mut self) -> Result<()> {
        if self.segment.is_some() {
            return Ok(());
        }

        let mut segment = SharedSegment::attach(&self.segment_path)?;
        let table = segment.table_mut()?;

        if table.is_initialized() {
            tracing::debug!(
                segment = %self.segment_path.display(),
                entries = table.len(),
                "attached to live segment"
            );
        } else {
            table.reset();
            match persistence::load(table, &self.data_path) {
                Ok(stats) => tracing::info!(
                    segment = %self.segment_path.display(),
                    loaded = stats.loaded,
                    skipped = stats.skipped,
                    "initialized fresh segment"
                ),
                Err(e) => tracing::warn!(
                    data = %self.data_path.display(),
                    error = ?e,
                    "checkpoint unreadable, starting empty"
                ),
            }
        }

        self.segment = Some(segment);
        Ok(())
    }

    fn table(&self) -> Option<&EntryTable> {
        self.segment.as_ref()?.table().ok()
    }

    fn table_mut(&mut self) -> Option<&mut EntryTable> {
        self.segment.as_mut()?.table_mut().ok()
    }

    /// Number of valid entries, 0 when not initialized.
    pub fn len(&self) -> usize {
        self.table().map_or(0, EntryTable::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records one visit of `path`.
    pub fn visit(&mut self, path: impl AsRef<[u8]>) {
        self.visit_at(path, DEFAULT_VISIT_VALUE, score::unix_now());
    }

    /// Adds `value` to the score of `path`.
    pub fn visit_with(&mut self, path: impl AsRef<[u8]>, value: f64) {
        self.visit_at(path, value, score::unix_now());
    }

    /// Adds `value` to the score of `path` as of `now`. A new path starts at
    /// exactly `value`, evicting the lowest-scored entry if the table is full.
    /// Values that are not finite and positive are ignored.
    pub fn visit_at(&mut self, path: impl AsRef<[u8]>, value: f64, now: f64) {
        if !(value.is_finite() && value > 0.0) {
            tracing::debug!(value, "ignoring non-positive visit value");
            return;
        }

        let path = path.as_ref();
        let Some(table) = self.table_mut() else {
            return;
        };

        match table.find(path) {
            Some(index) => {
                if let Some(entry) = table.entry_mut(index) {
                    let updated = score::to_score(entry.deadline(), now) + value;
                    entry.set_deadline(score::to_deadline(updated, now));
                }
            }
            None => {
                table.insert(path, score::to_deadline(value, now), now);
            }
        }
    }

    /// Current score of `path`, or 0 when unknown or not initialized.
    pub fn get(&self, path: impl AsRef<[u8]>) -> f64 {
        self.get_at(path, score::unix_now())
    }

    pub fn get_at(&self, path: impl AsRef<[u8]>, now: f64) -> f64 {
        let Some(table) = self.table() else {
            return 0.0;
        };

        table
            .find(path.as_ref())
            .and_then(|index| table.entry(index))
            .map_or(0.0, |entry| score::to_score(entry.deadline(), now))
    }

    pub fn del(&mut self, path: impl AsRef<[u8]>) -> DeleteOutcome {
        let Some(table) = self.table_mut() else {
            return DeleteOutcome::NotInitialized;
        };

        match table.find(path.as_ref()) {
            Some(index) => {
                table.evict(index);
                DeleteOutcome::Deleted
            }
            None => DeleteOutcome::NotFound,
        }
    }

    /// Up to `limit` entries (all when `None`), highest score first. Equal
    /// scores keep their slot order.
    pub fn list(&self, limit: Option<usize>) -> Vec<ScoredPath> {
        self.list_at(limit, score::unix_now())
    }

    pub fn list_at(&self, limit: Option<usize>, now: f64) -> Vec<ScoredPath> {
        let Some(table) = self.table() else {
            return Vec::new();
        };

        let mut scored: Vec<ScoredPath> = table
            .entries()
            .iter()
            .map(|entry| ScoredPath {
                path: entry.path().to_vec(),
                score: score::to_score(entry.deadline(), now),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(limit) = limit {
            scored.truncate(limit);
        }

        scored
    }

    /// Flushes the mapped table to its backing file. Returns whether the
    /// flush happened.
    pub fn sync(&self) -> bool {
        let Some(segment) = &self.segment else {
            return false;
        };

        match segment.sync() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = ?e, "segment sync failed");
                false
            }
        }
    }

    /// Writes the text checkpoint. Failures are logged and otherwise ignored;
    /// returns whether the checkpoint was written.
    pub fn save(&self) -> bool {
        let Some(table) = self.table() else {
            return false;
        };

        match persistence::save(table, &self.data_path) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = ?e, "checkpoint save failed");
                false
            }
        }
    }

    /// Checkpoints, flushes and unmaps. The store is inert afterwards until
    /// `init` is called again. The shared segment itself stays in place for
    /// other processes.
    pub fn shutdown(&mut self) {
        if self.segment.is_none() {
            return;
        }

        self.save();
        self.sync();
        self.segment = None;
    }
}
