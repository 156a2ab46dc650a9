//! Expression Buffer
//!
//! Accumulates input lines until the evaluator reports a complete
//! expression. The buffer is text, but it can be addressed as a list of
//! newline-terminated lines for after-the-fact correction (`amend-line`).

use super::error::{ReplError, Result};
use super::range::{IndexBase, LineRange};

/// What an amend did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amended {
    /// The addressed lines were replaced by one line
    Replaced,
    /// The addressed lines were removed
    Deleted,
    /// The buffer was empty
    NothingToAmend,
}

/// The pending, not yet evaluated expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionBuffer {
    text: String,
}

impl ExpressionBuffer {
    /// Replacement text that deletes lines instead of replacing them
    pub const DELETE: &'static str = "!";

    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been entered yet
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The buffered text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Append a line; a newline is added after it
    pub fn push_line(
        &mut self,
        line: &str,
    ) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Replace the whole buffer, e.g. with text read back from an editor.
    ///
    /// A missing final newline is added so the next line starts fresh.
    pub fn replace(
        &mut self,
        text: String,
    ) {
        self.text = text;
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Take the buffered text, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// The buffer split into lines, each keeping its newline
    pub fn lines(&self) -> Vec<&str> {
        self.text.split_inclusive('\n').collect()
    }

    /// Number of lines in the buffer
    pub fn line_count(&self) -> usize {
        self.text.split_inclusive('\n').count()
    }

    /// Replace or delete the lines addressed by `range`.
    ///
    /// A `replacement` of exactly `!` deletes the lines; anything else
    /// replaces the whole range with a single line. On an out-of-range
    /// selection the buffer is left untouched.
    pub fn amend(
        &mut self,
        range: &LineRange,
        base: IndexBase,
        replacement: &str,
    ) -> Result<Amended> {
        if self.is_empty() {
            return Ok(Amended::NothingToAmend);
        }

        let mut lines: Vec<String> = self.lines().into_iter().map(str::to_string).collect();
        let span = range
            .resolve(lines.len(), base)
            .ok_or_else(|| ReplError::AmendOutOfRange {
                range: range.to_string(),
                len: lines.len(),
            })?;

        let at = span.start;
        lines.drain(span);
        let amended = if replacement == Self::DELETE {
            Amended::Deleted
        } else {
            lines.insert(at, format!("{}\n", replacement));
            Amended::Replaced
        };

        self.text = lines.concat();
        Ok(amended)
    }

    /// The buffer with a line number in front of every line
    pub fn numbered(
        &self,
        base: IndexBase,
    ) -> String {
        let lines = self.lines();
        let last = lines.len() + base.first();
        let width = last.to_string().len();
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    "{:>width$}: {}",
                    i + base.first(),
                    line.trim_end_matches('\n'),
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> ExpressionBuffer {
        let mut buffer = ExpressionBuffer::new();
        for line in lines {
            buffer.push_line(line);
        }
        buffer
    }

    #[test]
    fn test_replace_terminates_last_line() {
        let mut buffer = ExpressionBuffer::new();
        buffer.replace("(1 +\n2".to_string());
        buffer.push_line("+");
        assert_eq!(buffer.lines(), vec!["(1 +\n", "2\n", "+\n"]);

        buffer.replace(String::new());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_push_and_lines() {
        let buffer = buffer(&["a", "b"]);
        assert_eq!(buffer.as_str(), "a\nb\n");
        assert_eq!(buffer.lines(), vec!["a\n", "b\n"]);
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_amend_single_line() {
        let mut buffer = buffer(&["a", "b", "c"]);
        let result = buffer.amend(&LineRange::single(2), IndexBase::One, "B");
        assert_eq!(result.unwrap(), Amended::Replaced);
        assert_eq!(buffer.as_str(), "a\nB\nc\n");
    }

    #[test]
    fn test_amend_range_collapses_to_one_line() {
        let mut buffer = buffer(&["a", "b", "c", "d"]);
        buffer
            .amend(&LineRange::inclusive(1, 2), IndexBase::Zero, "x")
            .unwrap();
        assert_eq!(buffer.as_str(), "a\nx\nd\n");
    }

    #[test]
    fn test_amend_delete() {
        let mut buffer = buffer(&["a", "b", "c"]);
        let result = buffer.amend(&LineRange::inclusive(-2, -1), IndexBase::One, "!");
        assert_eq!(result.unwrap(), Amended::Deleted);
        assert_eq!(buffer.as_str(), "a\n");
    }

    #[test]
    fn test_amend_empty_buffer() {
        let mut buffer = ExpressionBuffer::new();
        let result = buffer.amend(&LineRange::last(), IndexBase::One, "x");
        assert_eq!(result.unwrap(), Amended::NothingToAmend);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_amend_out_of_range_leaves_buffer() {
        let mut buffer = buffer(&["a", "b"]);
        let err = buffer
            .amend(&LineRange::single(5), IndexBase::One, "x")
            .unwrap_err();
        assert!(matches!(err, ReplError::AmendOutOfRange { len: 2, .. }));
        assert_eq!(buffer.as_str(), "a\nb\n");
    }

    #[test]
    fn test_numbered() {
        let buffer = buffer(&["let x = 1", "x"]);
        assert_eq!(buffer.numbered(IndexBase::One), "1: let x = 1\n2: x");
        assert_eq!(buffer.numbered(IndexBase::Zero), "0: let x = 1\n1: x");
    }
}
