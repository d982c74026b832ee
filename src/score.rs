//! # Score Model
//!
//! A frecency score is a visit count that decays exponentially with a fixed
//! half-life. Storing the score itself would require rewriting every entry as
//! time passes, so each entry stores a *deadline* instead: the absolute time
//! at which its score equals exactly 1.
//!
//! ```text
//! score(now)    = exp(rate * (deadline - now))
//! deadline(s)   = now + ln(s) / rate
//! rate          = ln(2) / HALF_LIFE_SECS
//! ```
//!
//! Before the deadline the score is above 1, after it the score keeps halving
//! every half-life without ever reaching 0. Adding to a score is done by
//! decoding at `now`, adding, and re-encoding as a new deadline.
//!
//! Scores passed to [`to_deadline`] must be strictly positive. Callers only
//! ever pass a decayed score plus a positive visit value, or the visit value
//! itself.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::HALF_LIFE_SECS;

#[inline]
pub fn decay_rate() -> f64 {
    std::f64::consts::LN_2 / HALF_LIFE_SECS
}

/// Current score of an entry whose score is 1 at `deadline`.
#[inline]
pub fn to_score(deadline: f64, now: f64) -> f64 {
    (decay_rate() * (deadline - now)).exp()
}

/// Deadline that encodes `score` as of `now`.
#[inline]
pub fn to_deadline(score: f64, now: f64) -> f64 {
    now + score.ln() / decay_rate()
}

/// Wall-clock time in seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
