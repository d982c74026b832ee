//! # frecstore Configuration Constants
//!
//! All layout and scoring constants live here, next to the values they
//! depend on. The shared segment has a single byte layout that every attached
//! process must agree on, so the sizes below are fixed at compile time and
//! checked with `const` assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! PATH_FIELD_SIZE (256 bytes)
//!       │
//!       ├─> MAX_PATH_LEN (derived: PATH_FIELD_SIZE - 1, room for the NUL)
//!       │
//!       └─> ENTRY_SIZE (PATH_FIELD_SIZE + 8 byte deadline = 264)
//!
//! MAX_ENTRIES (10,000)
//!       │
//!       └─> TABLE_SIZE (TABLE_HEADER_SIZE + MAX_ENTRIES * ENTRY_SIZE)
//!             Fixed for the lifetime of the segment, never grown or remapped.
//!
//! HALF_LIFE_SECS (30 days)
//!       │
//!       └─> decay rate (ln 2 / HALF_LIFE_SECS), see `score`
//!             Every persisted deadline is encoded against this rate. Changing
//!             it silently rescales every stored score.
//! ```
//!
//! ## Modifying Constants
//!
//! Changing any layout constant changes the segment format. Bump
//! `TABLE_MAGIC` at the same time so that processes built against the old
//! layout reinitialize instead of misreading the table.

// ============================================================================
// TABLE LAYOUT
// Shared by every process attached to the segment
// ============================================================================

/// Number of entry slots in the table. The segment is always sized for all of
/// them, even though typical usage fills far fewer.
pub const MAX_ENTRIES: usize = 10_000;

/// Size of the fixed, NUL-terminated path field of an entry.
pub const PATH_FIELD_SIZE: usize = 256;

/// Longest path that fits in the field next to its terminator.
pub const MAX_PATH_LEN: usize = PATH_FIELD_SIZE - 1;

/// Size of the encoded deadline (IEEE-754 double).
pub const DEADLINE_SIZE: usize = 8;

/// Size of one entry slot.
pub const ENTRY_SIZE: usize = PATH_FIELD_SIZE + DEADLINE_SIZE;

/// Size of the table header: 4-byte magic followed by 4-byte count.
pub const TABLE_HEADER_SIZE: usize = 8;

/// Total byte size of the shared segment.
pub const TABLE_SIZE: usize = TABLE_HEADER_SIZE + MAX_ENTRIES * ENTRY_SIZE;

/// Sentinel stored in the header once a segment has been initialized.
/// Reads as `FRC1` in a hex dump of the little-endian field.
pub const TABLE_MAGIC: u32 = u32::from_le_bytes(*b"FRC1");

const _: () = assert!(
    MAX_PATH_LEN + 1 == PATH_FIELD_SIZE,
    "MAX_PATH_LEN must leave room for the NUL terminator"
);

const _: () = assert!(ENTRY_SIZE == 264, "entry layout drifted from 256 + 8 bytes");

const _: () = assert!(
    MAX_ENTRIES <= u32::MAX as usize,
    "entry count must fit the 4-byte count field"
);

const _: () = assert!(
    TABLE_SIZE == TABLE_HEADER_SIZE + MAX_ENTRIES * ENTRY_SIZE,
    "TABLE_SIZE derivation mismatch"
);

// ============================================================================
// SCORING
// ============================================================================

/// Time for the score of an unvisited path to halve (30 days).
pub const HALF_LIFE_SECS: f64 = 30.0 * 24.0 * 60.0 * 60.0;

/// Score added by a single visit when the caller gives no explicit value.
pub const DEFAULT_VISIT_VALUE: f64 = 1.0;

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Number of fractional digits written for each deadline.
pub const DEADLINE_PRECISION: usize = 6;

/// Default period between checkpoint saves of the text file.
pub const DEFAULT_CHECKPOINT_INTERVAL_SECS: u64 = 60;
