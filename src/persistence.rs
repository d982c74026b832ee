//! # Persistence Codec
//!
//! Checkpoints the entry table to a line-oriented text file and seeds an
//! empty table from it on cold start.
//!
//! ## Record Format
//!
//! ```text
//! <byte-length> <path> <deadline>\n
//!
//! 14 /home/user/src 1712345678.123456
//! 20 /tmp/dir with space 1709000000.000000
//! ```
//!
//! `<byte-length>` is the decimal length of `<path>` in bytes. The parser
//! takes exactly that many bytes as the path, so paths containing spaces
//! need no escaping. A record never spans lines: a path containing `\n` is
//! left out of the checkpoint, and a length that reaches past the end of its
//! line marks the line as malformed. `<deadline>` is written with six
//! fractional digits.
//!
//! ## Error Policy
//!
//! - A line that does not parse (bad length, path running past the end of
//!   the line, missing separator, unparsable or non-finite deadline) is
//!   skipped on its own and parsing resumes after its newline.
//! - A missing file is a cold start, not an error.
//! - `save` reports failures to its caller; the store swallows them because
//!   the mapped table stays authoritative until the next successful save.
//!   The checkpoint is written to a sibling temp file and renamed into place,
//!   so a crash or a concurrent save never leaves a torn file behind.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use tempfile::NamedTempFile;

use crate::config::DEADLINE_PRECISION;
use crate::storage::{normalize_key, EntryTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
    pub dropped: usize,
}

/// Appends one encoded record to `out`. Returns false, writing nothing, for
/// a path containing a newline, which the line format cannot carry.
pub fn encode_record(out: &mut Vec<u8>, path: &[u8], deadline: f64) -> bool {
    if path.contains(&b'\n') {
        return false;
    }

    out.extend_from_slice(path.len().to_string().as_bytes());
    out.push(b' ');
    out.extend_from_slice(path);
    out.push(b' ');
    out.extend_from_slice(format!("{:.*}", DEADLINE_PRECISION, deadline).as_bytes());
    out.push(b'\n');
    true
}

/// Iterator over the well-formed records of an encoded buffer.
pub struct Records<'a> {
    bytes: &'a [u8],
    pos: usize,
    skipped: usize,
}

impl<'a> Records<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            skipped: 0,
        }
    }

    /// Malformed records passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn parse_at(&self, start: usize) -> Option<(&'a [u8], f64, usize)> {
        let bytes = self.bytes;

        let digits = bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let len_end = start + digits;
        if bytes.get(len_end) != Some(&b' ') {
            return None;
        }
        let len: usize = std::str::from_utf8(&bytes[start..len_end]).ok()?.parse().ok()?;

        let path_start = len_end + 1;
        let path_end = path_start.checked_add(len)?;
        if path_end > bytes.len() || bytes.get(path_end) != Some(&b' ') {
            return None;
        }
        let path = &bytes[path_start..path_end];
        if path.contains(&b'\n') {
            return None;
        }

        let deadline_start = path_end + 1;
        let line_end = bytes[deadline_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |offset| deadline_start + offset);
        let deadline: f64 = std::str::from_utf8(&bytes[deadline_start..line_end])
            .ok()?
            .trim_end_matches('\r')
            .parse()
            .ok()?;
        if !deadline.is_finite() {
            return None;
        }

        let next = (line_end + 1).min(bytes.len());
        Some((path, deadline, next))
    }

    fn skip_line(&mut self, start: usize) {
        self.skipped += 1;
        self.pos = self.bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |offset| start + offset + 1);
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = (&'a [u8], f64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let start = self.pos;

            if self.bytes[start] == b'\n' {
                self.pos += 1;
                continue;
            }

            match self.parse_at(start) {
                Some((path, deadline, next)) => {
                    self.pos = next;
                    return Some((path, deadline));
                }
                None => self.skip_line(start),
            }
        }

        None
    }
}

/// Appends the records in `bytes` to `table` until it is full. Records whose
/// normalized path is already present are dropped along with overflow.
pub fn load_bytes(table: &mut EntryTable, bytes: &[u8]) -> LoadStats {
    let mut stats = LoadStats::default();
    let mut seen: HashSet<Vec<u8>> = table
        .entries()
        .iter()
        .map(|entry| entry.path().to_vec())
        .collect();

    let mut records = Records::new(bytes);
    for (path, deadline) in records.by_ref() {
        let key = normalize_key(path);
        if table.is_full() || !seen.insert(key.to_vec()) {
            stats.dropped += 1;
            continue;
        }

        if table.push(key, deadline).is_some() {
            stats.loaded += 1;
        }
    }
    stats.skipped = records.skipped();

    stats
}

/// Seeds `table` from the checkpoint at `path`. A missing file loads nothing.
pub fn load<P: AsRef<Path>>(table: &mut EntryTable, path: P) -> Result<LoadStats> {
    let path = path.as_ref();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadStats::default()),
        Err(e) => {
            return Err(e)
                .wrap_err_with(|| format!("failed to read checkpoint '{}'", path.display()))
        }
    };

    let stats = load_bytes(table, &bytes);

    tracing::debug!(
        path = %path.display(),
        loaded = stats.loaded,
        skipped = stats.skipped,
        dropped = stats.dropped,
        "loaded checkpoint"
    );

    Ok(stats)
}

/// Encodes every valid entry of `table` in slot order, leaving out paths
/// that contain a newline. Returns the buffer and the number of records.
pub fn encode_table(table: &EntryTable) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(table.len() * 64);
    let mut records = 0;

    for entry in table.entries() {
        if encode_record(&mut out, entry.path(), entry.deadline()) {
            records += 1;
        } else {
            tracing::debug!(
                path = %String::from_utf8_lossy(entry.path()),
                "path contains a newline, left out of checkpoint"
            );
        }
    }

    (out, records)
}

/// Writes the checkpoint for `table` to `path`, creating parent directories.
/// Returns the number of records written.
pub fn save<P: AsRef<Path>>(table: &EntryTable, path: P) -> Result<usize> {
    let path = path.as_ref();

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).wrap_err_with(|| {
                format!("failed to create checkpoint directory '{}'", parent.display())
            })?;
            parent
        }
        None => Path::new("."),
    };

    let (encoded, records) = encode_table(table);

    let mut staged = NamedTempFile::new_in(dir).wrap_err_with(|| {
        format!("failed to create temp checkpoint in '{}'", dir.display())
    })?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        writer
            .write_all(&encoded)
            .and_then(|_| writer.flush())
            .wrap_err_with(|| format!("failed to write checkpoint '{}'", path.display()))?;
    }
    staged
        .persist(path)
        .map_err(|e| e.error)
        .wrap_err_with(|| format!("failed to replace checkpoint '{}'", path.display()))?;

    tracing::debug!(path = %path.display(), records, "saved checkpoint");

    Ok(records)
}
