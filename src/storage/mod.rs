//! # Storage Module
//!
//! The storage layer holds the frecency table directly inside a memory-mapped
//! file that several processes map at once. Nothing is deserialized on
//! attach: the table struct *is* the file layout, viewed in place through
//! zerocopy.
//!
//! ## Components
//!
//! - `layout`: the 264-byte `Entry` record
//! - `table`: `EntryTable`, header plus the fixed slot array, with lookup,
//!   append, swap-remove and lowest-score eviction
//! - `segment`: `SharedSegment`, the mapping lifecycle of the backing file
//!
//! ## Two Durability Tiers
//!
//! ```text
//! visit/del ──> EntryTable (mapped, shared) ──sync()──> backing file pages
//!                        │
//!                        └──save()──> persistence text file (survives reboot)
//! ```
//!
//! The segment normally lives on tmpfs, so `sync()` keeps the shared view
//! consistent but does not survive a reboot. The text checkpoint written by
//! `persistence` does, and seeds a fresh segment on the next cold start.
//!
//! ## Platform Support
//!
//! Uses the `memmap2` crate, which maps with `MAP_SHARED` on Unix and
//! `MapViewOfFile` on Windows.

mod layout;
mod segment;
mod table;

pub use layout::{normalize_key, Entry};
pub use segment::SharedSegment;
pub use table::EntryTable;
