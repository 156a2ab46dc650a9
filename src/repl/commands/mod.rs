//! REPL Commands
//!
//! Meta-commands are matched against every input line before it reaches
//! the evaluator. A matched line is consumed by its handler and never
//! becomes part of the expression buffer.

pub mod builtin;
pub mod dispatch;
pub mod registry;

use std::io::Write;

pub use dispatch::{shell_words, CommandDispatcher, Dispatch};
pub use registry::{Arity, CommandMatcher, CommandRegistry, CommandSpec, HandlerFn, MatchResult};

use super::backend_trait::{Editor, Evaluator};
use super::buffer::ExpressionBuffer;
use super::error::Result;
use super::history::{HistorySlice, HistoryStore};
use super::input::InputChain;
use super::range::IndexBase;
use super::session::{BreakoutSignal, SessionStack};
use super::value::Value;

/// What the engine should do after a command ran
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Keep reading
    Continue,
    /// Unwind nested sessions
    Breakout(BreakoutSignal),
    /// Evaluate the expression and start a nested session on the result
    Nest(String),
}

/// Display settings shared by commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSettings {
    /// Base for line numbers typed and shown for the input buffer
    pub index_base: IndexBase,
    /// Colour line numbers
    pub colors: bool,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            index_base: IndexBase::One,
            colors: false,
        }
    }
}

/// Everything a command handler may look at or change
pub struct CommandContext<'a> {
    /// Output sink
    pub output: &'a mut dyn Write,
    /// The pending expression
    pub buffer: &'a mut ExpressionBuffer,
    /// Input history
    pub history: &'a mut HistoryStore,
    /// All commands, for commands that describe other commands
    pub registry: &'a CommandRegistry,
    /// Running sessions
    pub sessions: &'a SessionStack,
    /// Where the next lines come from
    pub input: &'a mut InputChain,
    /// External editor
    pub editor: &'a mut dyn Editor,
    /// The evaluator, for source lookup
    pub evaluator: &'a dyn Evaluator,
    /// Display settings
    pub settings: CommandSettings,
    /// History index of the line being dispatched, if it was recorded
    pub line_index: Option<usize>,
}

impl<'a> CommandContext<'a> {
    /// Target of the innermost session
    pub fn target(&self) -> Value {
        self.sessions
            .current()
            .map(|session| session.target.clone())
            .unwrap_or_default()
    }

    /// Level of the innermost session
    pub fn level(&self) -> usize {
        self.sessions.level().unwrap_or(0)
    }

    /// History as it was before the current line was entered
    pub fn past_history(&self) -> HistorySlice<'_> {
        match self.line_index {
            Some(index) => self.history.up_to(index),
            None => self.history.all(),
        }
    }

    /// Write one line to the output sink
    pub fn say(
        &mut self,
        text: impl AsRef<str>,
    ) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("buffer", &self.buffer)
            .field("settings", &self.settings)
            .field("line_index", &self.line_index)
            .finish_non_exhaustive()
    }
}
