//! # Entry Table
//!
//! The whole shared segment viewed as one struct: an 8-byte header followed
//! by `MAX_ENTRIES` fixed slots.
//!
//! ```text
//! +---------------------------+  offset 0
//! | magic (u32 LE)            |
//! | count (u32 LE)            |
//! +---------------------------+  offset 8
//! | entries[0]     (264 B)    |
//! | entries[1]     (264 B)    |
//! | ...                       |
//! | entries[9999]  (264 B)    |
//! +---------------------------+  offset TABLE_SIZE
//! ```
//!
//! Only `entries[..count]` are valid. Slots past `count` hold whatever was
//! there before (zeroes or evicted records) and are never read as entries.
//!
//! ## Slot Management
//!
//! The array is never resized, so offsets stay identical in every process
//! that maps the segment. Appends write slot `count` and bump `count`.
//! Removal is a swap-remove: the last valid entry is copied over the removed
//! slot and `count` shrinks by one. Removal is O(1) but does not preserve
//! order, so nothing may rely on iteration order matching insertion order.
//!
//! ## Concurrency
//!
//! There is no lock. Two processes mutating the same segment can lose an
//! update to `count` or overwrite each other's slots. Visits are human-paced,
//! so the window is accepted rather than serialized.

use eyre::{ensure, Result};
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::layout::{normalize_key, Entry};
use crate::config::{MAX_ENTRIES, TABLE_MAGIC, TABLE_SIZE};
use crate::score;

#[repr(C)]
#[derive(Debug, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct EntryTable {
    magic: U32,
    count: U32,
    entries: [Entry; MAX_ENTRIES],
}

const _: () = assert!(std::mem::size_of::<EntryTable>() == TABLE_SIZE);

impl EntryTable {
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= TABLE_SIZE,
            "buffer too small for EntryTable: {} < {}",
            bytes.len(),
            TABLE_SIZE
        );

        Self::ref_from_bytes(&bytes[..TABLE_SIZE])
            .map_err(|_| eyre::eyre!("failed to view {} bytes as EntryTable", TABLE_SIZE))
    }

    pub fn from_bytes_mut(bytes: &mut [u8]) -> Result<&mut Self> {
        ensure!(
            bytes.len() >= TABLE_SIZE,
            "buffer too small for EntryTable: {} < {}",
            bytes.len(),
            TABLE_SIZE
        );

        Self::mut_from_bytes(&mut bytes[..TABLE_SIZE])
            .map_err(|_| eyre::eyre!("failed to view {} bytes as EntryTable", TABLE_SIZE))
    }

    /// Whether a store has already claimed this segment.
    pub fn is_initialized(&self) -> bool {
        self.magic.get() == TABLE_MAGIC
    }

    /// Claims the segment and forgets every entry. Slot contents are left in
    /// place; they are unreachable once `count` is 0.
    pub fn reset(&mut self) {
        self.magic = U32::new(TABLE_MAGIC);
        self.count = U32::new(0);
    }

    /// Number of valid entries. A `count` beyond capacity can only come from a
    /// torn write by another process and is clamped.
    pub fn len(&self) -> usize {
        (self.count.get() as usize).min(MAX_ENTRIES)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == MAX_ENTRIES
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries[..self.len()]
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries().get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        let len = self.len();
        self.entries[..len].get_mut(index)
    }

    /// Index of the entry stored under `path`, scanning linearly.
    pub fn find(&self, path: &[u8]) -> Option<usize> {
        let key = normalize_key(path);
        self.entries().iter().position(|entry| entry.matches(key))
    }

    /// Appends without evicting. Returns the new slot, or `None` when full.
    /// Does not check for an existing entry under the same path.
    pub fn push(&mut self, path: &[u8], deadline: f64) -> Option<usize> {
        let index = self.len();
        if index >= MAX_ENTRIES {
            return None;
        }

        let slot = &mut self.entries[index];
        slot.set_path(path);
        slot.set_deadline(deadline);
        self.count = U32::new(index as u32 + 1);

        Some(index)
    }

    /// Appends a new entry, first evicting the lowest-scored entry as of
    /// `now` if the table is full. The caller guarantees `path` is absent.
    pub fn insert(&mut self, path: &[u8], deadline: f64, now: f64) -> Option<usize> {
        if self.is_full() && self.evict_lowest(now).is_none() {
            return None;
        }

        self.push(path, deadline)
    }

    /// Swap-removes the entry at `index`. Returns false if out of range.
    pub fn evict(&mut self, index: usize) -> bool {
        let len = self.len();
        if index >= len {
            return false;
        }

        let last = len - 1;
        if index != last {
            self.entries[index] = self.entries[last];
        }
        self.count = U32::new(last as u32);

        true
    }

    /// Index of the entry with the strictly smallest score as of `now`.
    /// Ties resolve to the lowest index. A NaN score (a corrupt deadline
    /// written by some other process) ranks below everything.
    pub fn lowest(&self, now: f64) -> Option<usize> {
        let mut lowest: Option<(usize, f64)> = None;

        for (index, entry) in self.entries().iter().enumerate() {
            let score = score::to_score(entry.deadline(), now);
            let score = if score.is_nan() { f64::NEG_INFINITY } else { score };
            match lowest {
                Some((_, min)) if score >= min => {}
                _ => lowest = Some((index, score)),
            }
        }

        lowest.map(|(index, _)| index)
    }

    /// Evicts the lowest-scored entry and returns the slot it occupied.
    pub fn evict_lowest(&mut self, now: f64) -> Option<usize> {
        let index = self.lowest(now)?;

        tracing::debug!(
            path = %String::from_utf8_lossy(self.entries[index].path()),
            "evicting lowest scored entry"
        );

        self.evict(index);
        Some(index)
    }
}
