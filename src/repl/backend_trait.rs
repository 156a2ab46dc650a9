//! REPL Collaborator Traits
//!
//! The engine does not know any language. It asks an [`Evaluator`] whether
//! the buffered text is complete and what it evaluates to, hands results to
//! a [`Printer`], and delegates text editing to an [`Editor`].

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::engine::EngineContext;
use super::error::{EvalError, Result};
use super::value::Value;

/// Evaluator Trait
///
/// The language side of the REPL.
pub trait Evaluator {
    /// Whether `source` is a complete expression that can be evaluated
    fn is_complete(
        &self,
        source: &str,
    ) -> bool;

    /// Evaluate `source` against `target`.
    ///
    /// Errors are values: they are printed and the session carries on.
    fn evaluate(
        &mut self,
        source: &str,
        target: &Value,
        context: &EngineContext,
    ) -> std::result::Result<Value, EvalError>;

    /// Source text of the method `name` as seen from `target`, if known
    fn source_for(
        &self,
        _name: &str,
        _target: &Value,
    ) -> Option<String> {
        None
    }
}

/// Printer Trait
///
/// The print step of the loop.
pub trait Printer {
    /// Write an evaluation result to `out`
    fn print(
        &mut self,
        out: &mut dyn Write,
        result: &std::result::Result<Value, EvalError>,
    ) -> io::Result<()>;
}

/// Editor Trait
///
/// An external text editor.
pub trait Editor {
    /// Open `path` at `line` and block until the editor exits
    fn open_for_edit(
        &mut self,
        path: &Path,
        line: usize,
    ) -> Result<()>;

    /// Read the edited file back
    fn read_back(
        &self,
        path: &Path,
    ) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
