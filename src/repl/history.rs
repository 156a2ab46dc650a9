//! Input History
//!
//! An append-only log of the lines entered in this process, mirrored to a
//! history file that other processes may share.
//!
//! The file is only ever opened for appending. Each save writes the lines
//! added since this process last saved, so lines appended by other
//! processes in the meantime are never rewritten, and clearing the
//! in-memory history never removes anything from disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use regex::Regex;
use tracing::debug;

use super::error::{ReplError, Result};
use super::range::{IndexBase, LineRange};

/// One history line and its position in the in-memory history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    /// Absolute index in the in-memory history
    pub index: usize,
    /// The line as entered
    pub line: &'a str,
}

/// A contiguous run of history lines that remembers where it starts
#[derive(Debug, Clone, Copy)]
pub struct HistorySlice<'a> {
    start: usize,
    lines: &'a [String],
}

impl<'a> HistorySlice<'a> {
    /// Absolute index of the first line
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the slice has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines, without indices
    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    /// Lines tagged with their absolute indices
    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry<'a>> + 'a {
        let start = self.start;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| HistoryEntry {
                index: start + i,
                line,
            })
    }

    /// The first `n` lines
    pub fn head(
        &self,
        n: usize,
    ) -> HistorySlice<'a> {
        HistorySlice {
            start: self.start,
            lines: &self.lines[..n.min(self.lines.len())],
        }
    }

    /// The last `n` lines
    pub fn tail(
        &self,
        n: usize,
    ) -> HistorySlice<'a> {
        let offset = self.lines.len().saturating_sub(n);
        HistorySlice {
            start: self.start + offset,
            lines: &self.lines[offset..],
        }
    }

    /// The lines addressed by `range`, counted from the start of this slice
    pub fn select(
        &self,
        range: &LineRange,
    ) -> Option<HistorySlice<'a>> {
        let span = range.clamp(self.lines.len(), IndexBase::Zero)?;
        Some(HistorySlice {
            start: self.start + span.start,
            lines: &self.lines[span],
        })
    }

    /// Lines matching `pattern`, with their indices
    pub fn grep(
        &self,
        pattern: &Regex,
    ) -> Vec<HistoryEntry<'a>> {
        self.entries()
            .filter(|entry| pattern.is_match(entry.line))
            .collect()
    }

    /// The lines joined for re-entry as input
    pub fn joined(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// In-memory history plus the persistence cursor
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<String>,
    /// How many of `entries` are already in the history file
    last_saved_count: usize,
}

impl HistoryStore {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, returning its index
    pub fn push(
        &mut self,
        line: impl Into<String>,
    ) -> usize {
        self.entries.push(line.into());
        self.entries.len() - 1
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Line at `index`
    pub fn get(
        &self,
        index: usize,
    ) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// All lines, oldest first
    pub fn lines(&self) -> &[String] {
        &self.entries
    }

    /// Number of lines already flushed to the history file
    pub fn last_saved_count(&self) -> usize {
        self.last_saved_count
    }

    /// The whole history as a slice
    pub fn all(&self) -> HistorySlice<'_> {
        self.up_to(self.entries.len())
    }

    /// The lines before index `end`
    pub fn up_to(
        &self,
        end: usize,
    ) -> HistorySlice<'_> {
        HistorySlice {
            start: 0,
            lines: &self.entries[..end.min(self.entries.len())],
        }
    }

    /// Lines matching `pattern`
    pub fn grep(
        &self,
        pattern: &Regex,
    ) -> Vec<HistoryEntry<'_>> {
        self.all().grep(pattern)
    }

    /// The first `n` lines
    pub fn head(
        &self,
        n: usize,
    ) -> HistorySlice<'_> {
        self.all().head(n)
    }

    /// The last `n` lines
    pub fn tail(
        &self,
        n: usize,
    ) -> HistorySlice<'_> {
        self.all().tail(n)
    }

    /// The lines addressed by `range` (zero-based, end clamped)
    pub fn select(
        &self,
        range: &LineRange,
    ) -> Option<HistorySlice<'_>> {
        self.all().select(range)
    }

    /// Text to feed back as input for the lines in `range`.
    ///
    /// Nothing is executed here; the caller injects the text ahead of the
    /// interactive input.
    pub fn replay(
        &self,
        range: &LineRange,
    ) -> Option<String> {
        self.select(range).map(|slice| slice.joined())
    }

    /// Forget the in-memory history. The history file is not touched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_saved_count = 0;
    }

    /// Seed the history from `path`, oldest line first.
    ///
    /// A missing file is not an error. Everything loaded counts as saved.
    pub fn load(
        &mut self,
        path: &Path,
    ) -> Result<usize> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(ReplError::persistence(path, e)),
        };

        // other processes share the file; a line in another encoding must not
        // lock this one out
        let before = self.entries.len();
        self.entries
            .extend(String::from_utf8_lossy(&bytes).lines().map(str::to_string));
        self.last_saved_count = self.entries.len();

        let loaded = self.entries.len() - before;
        debug!("loaded {} history lines from {}", loaded, path.display());
        Ok(loaded)
    }

    /// Append the lines added since the last save to `path`.
    ///
    /// Creates the file if needed and returns the number of lines written.
    pub fn save(
        &mut self,
        path: &Path,
    ) -> Result<usize> {
        let on_disk = match fs::read(path) {
            Ok(bytes) => bytes.iter().filter(|&&b| b == b'\n').count(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(ReplError::persistence(path, e)),
        };

        let pending = &self.entries[self.last_saved_count.min(self.entries.len())..];
        debug!(
            "history file {} has {} lines, appending {}",
            path.display(),
            on_disk,
            pending.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ReplError::persistence(path, e))?;

        if !pending.is_empty() {
            // one write per save keeps our lines contiguous in the file
            let mut chunk = String::new();
            for line in pending {
                chunk.push_str(line);
                chunk.push('\n');
            }
            file.write_all(chunk.as_bytes())
                .map_err(|e| ReplError::persistence(path, e))?;
        }

        let written = pending.len();
        self.last_saved_count = self.entries.len();
        Ok(written)
    }
}
