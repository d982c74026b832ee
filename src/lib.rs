//! # frecstore - Shared Frecency Scores for Paths
//!
//! frecstore ranks filesystem paths by *frecency*, a single score that
//! blends how often and how recently a path was visited. Every process on the
//! machine that opens the store sees the same table, so a directory visited
//! in one editor instance ranks higher in the quick-switch list of another.
//!
//! ## Quick Start
//!
//! ```ignore
//! use frecstore::FrecencyStore;
//!
//! let mut store = FrecencyStore::builder().build();
//! if store.init() {
//!     store.visit("/home/user/src/project");
//!     for entry in store.list(Some(10)) {
//!         println!("{:.2} {}", entry.score, entry.path_lossy());
//!     }
//! }
//! store.shutdown();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  FrecencyStore (init/visit/get/del/list/..)  │
//! ├──────────────────────┬──────────────────────┤
//! │  score (decay math)  │  persistence (text)  │
//! ├──────────────────────┴──────────────────────┤
//! │   EntryTable (fixed slots, swap-remove)      │
//! ├─────────────────────────────────────────────┤
//! │   SharedSegment (memory-mapped, MAP_SHARED)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Scores are never stored directly. Each entry keeps the *deadline* at which
//! its score equals 1, which lets the score decay continuously without any
//! background rewriting. See [`score`].
//!
//! ## Limitations
//!
//! Processes mutate the shared table without a lock. Concurrent writers can
//! lose an update or observe a transiently inconsistent table. Visits are
//! human-paced, so this is accepted rather than serialized.
//!
//! ## Module Overview
//!
//! - [`config`]: layout and scoring constants, default file locations
//! - [`score`]: score/deadline conversions
//! - [`storage`]: entry layout, table operations, segment mapping
//! - [`persistence`]: text checkpoint format
//! - [`store`]: the public store API
//! - [`checkpoint`]: periodic checkpoint thread
//! - [`cli`]: command parsing for the `frecstore` binary

#[macro_use]
mod macros;

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod persistence;
pub mod score;
pub mod storage;
pub mod store;

pub use checkpoint::{Checkpointer, SharedStore};
pub use store::{DeleteOutcome, FrecencyStore, ScoredPath, StoreBuilder};
