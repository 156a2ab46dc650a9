//! Input Sources
//!
//! The engine reads through an [`InputChain`]: text injected by commands
//! (`hist --replay`, `play`, `edit --reload`) is read first, and only when
//! it is used up does reading fall back to the interactive source.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Something lines can be read from
pub trait InputSource {
    /// Read one line, showing `prompt` if the source is interactive.
    ///
    /// `Ok(None)` means end of input.
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>>;
}

/// Lines from a string, e.g. a script or replayed history
#[derive(Debug, Clone, Default)]
pub struct ScriptInput {
    lines: VecDeque<String>,
}

impl ScriptInput {
    /// Split `text` into lines
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Lines not yet read
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

impl From<&str> for ScriptInput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl InputSource for ScriptInput {
    fn read_line(
        &mut self,
        _prompt: &str,
    ) -> io::Result<Option<String>> {
        Ok(self.next_line())
    }
}

/// Lines from any buffered reader, e.g. piped stdin
#[derive(Debug)]
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for ReaderInput<R> {
    fn read_line(
        &mut self,
        _prompt: &str,
    ) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Where a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    /// Typed by the user (or read from the base source)
    Interactive,
    /// Injected by a command
    Injected,
}

/// Injected text stacked on top of the interactive source
pub struct InputChain {
    base: Box<dyn InputSource>,
    injected: Vec<ScriptInput>,
}

impl InputChain {
    /// Read from `base` when nothing is injected
    pub fn new(base: Box<dyn InputSource>) -> Self {
        Self {
            base,
            injected: Vec::new(),
        }
    }

    /// Queue `text` to be read before anything else, including text
    /// injected earlier.
    pub fn inject(
        &mut self,
        text: &str,
    ) {
        let script = ScriptInput::new(text);
        if script.remaining() > 0 {
            self.injected.push(script);
        }
    }

    /// Whether injected lines are pending
    pub fn is_replaying(&self) -> bool {
        self.injected.iter().any(|script| script.remaining() > 0)
    }

    /// Next line and where it came from
    pub fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<(String, InputOrigin)>> {
        while let Some(script) = self.injected.last_mut() {
            if let Some(line) = script.next_line() {
                return Ok(Some((line, InputOrigin::Injected)));
            }
            self.injected.pop();
        }
        Ok(self
            .base
            .read_line(prompt)?
            .map(|line| (line, InputOrigin::Interactive)))
    }
}

impl std::fmt::Debug for InputChain {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("InputChain")
            .field("injected", &self.injected)
            .finish_non_exhaustive()
    }
}
