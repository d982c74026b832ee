//! # frecstore Configuration Module
//!
//! Centralizes the compile-time constants that fix the segment layout and the
//! scoring model, plus the resolution of the two well-known file locations.
//!
//! ## Module Organization
//!
//! - [`constants`]: layout, scoring and persistence constants with
//!   compile-time consistency checks
//! - [`paths`]: default locations of the shared segment and the persistence
//!   file, with environment overrides

pub mod constants;
pub mod paths;

pub use constants::*;
pub use paths::{default_data_path, default_segment_path};
