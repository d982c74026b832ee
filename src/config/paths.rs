//! # Well-Known File Locations
//!
//! Resolves where the shared segment and the persistence file live when the
//! caller does not configure them explicitly.
//!
//! ## Shared Segment
//!
//! The segment must be found at the same path by every process that wants to
//! share it. Resolution order:
//!
//! 1. `FRECSTORE_SEGMENT`
//! 2. `/dev/shm/frecstore.shm` when `/dev/shm` exists (tmpfs on Linux)
//! 3. `<temp dir>/frecstore.shm`
//!
//! ## Persistence File
//!
//! The text checkpoint is user data and survives reboots. Resolution order:
//!
//! 1. `FRECSTORE_DATA`
//! 2. `$XDG_DATA_HOME/frecstore/frecency.txt`
//! 3. `$HOME/.local/share/frecstore/frecency.txt`
//! 4. `<temp dir>/frecstore/frecency.txt`
//!
//! An empty variable counts as unset.

use std::env;
use std::path::{Path, PathBuf};

pub const SEGMENT_ENV_VAR: &str = "FRECSTORE_SEGMENT";
pub const DATA_ENV_VAR: &str = "FRECSTORE_DATA";

const SEGMENT_FILE: &str = "frecstore.shm";
const DATA_DIR: &str = "frecstore";
const DATA_FILE: &str = "frecency.txt";
const SHM_DIR: &str = "/dev/shm";

pub fn default_segment_path() -> PathBuf {
    resolve_segment_path(env_var, Path::new(SHM_DIR).is_dir())
}

pub fn default_data_path() -> PathBuf {
    resolve_data_path(env_var)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve_segment_path<F>(lookup: F, shm_available: bool) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(custom) = lookup(SEGMENT_ENV_VAR) {
        return PathBuf::from(custom);
    }

    if shm_available {
        return Path::new(SHM_DIR).join(SEGMENT_FILE);
    }

    env::temp_dir().join(SEGMENT_FILE)
}

fn resolve_data_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(custom) = lookup(DATA_ENV_VAR) {
        return PathBuf::from(custom);
    }

    let data_home = lookup("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(env::temp_dir);

    data_home.join(DATA_DIR).join(DATA_FILE)
}
