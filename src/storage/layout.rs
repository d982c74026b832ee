//! # Entry Layout
//!
//! One slot of the shared table: a NUL-terminated path in a fixed 256-byte
//! field followed by the little-endian deadline.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ---------------------------------------------
//! 0       256   path (bytes up to the first NUL, max 255)
//! 256     8     deadline (f64, seconds since the Unix epoch)
//! ```
//!
//! The struct is `Unaligned` so it can be viewed directly inside the mapping
//! at any offset, with no padding between slots.

use zerocopy::little_endian::F64;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{ENTRY_SIZE, MAX_PATH_LEN, PATH_FIELD_SIZE};

#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct Entry {
    path: [u8; PATH_FIELD_SIZE],
    deadline: F64,
}

const _: () = assert!(std::mem::size_of::<Entry>() == ENTRY_SIZE);

impl Entry {
    zerocopy_accessors! {
        deadline: f64,
    }

    /// Stored path bytes, up to (not including) the terminator.
    pub fn path(&self) -> &[u8] {
        let len = self
            .path
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PATH_FIELD_SIZE);
        &self.path[..len]
    }

    /// Overwrites the path field. The key is normalized first, and the rest
    /// of the field is zeroed so no stale bytes survive behind the terminator.
    pub fn set_path(&mut self, path: &[u8]) {
        let key = normalize_key(path);
        self.path[..key.len()].copy_from_slice(key);
        self.path[key.len()..].fill(0);
    }

    pub fn matches(&self, key: &[u8]) -> bool {
        self.path() == key
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("path", &String::from_utf8_lossy(self.path()))
            .field("deadline", &self.deadline())
            .finish()
    }
}

/// Reduces a caller-supplied path to the bytes the table can hold: everything
/// before the first NUL, truncated to `MAX_PATH_LEN`. Lookups and inserts both
/// go through this, so an over-long path always resolves to the same slot.
pub fn normalize_key(path: &[u8]) -> &[u8] {
    let end = path.iter().position(|&b| b == 0).unwrap_or(path.len());
    &path[..end.min(MAX_PATH_LEN)]
}
