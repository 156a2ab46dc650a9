//! Command Dispatch
//!
//! Matches a line against the registry, turns the captured text into
//! positional arguments and runs the handler.

use std::rc::Rc;

use tracing::debug;

use super::registry::{Arity, MatchResult};
use super::{CommandContext, CommandOutcome};
use crate::repl::error::{ReplError, Result};

/// Result of offering a line to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// No command recognised the line; it is expression input
    NoCommand,
    /// A command consumed the line
    Handled(CommandOutcome),
}

/// Runs commands for input lines
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Offer `line` to the registered commands.
    ///
    /// Handler errors are returned to the caller, which reports them; the
    /// line counts as consumed either way.
    pub fn dispatch(
        line: &str,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Dispatch> {
        let registry = ctx.registry;
        let Some((spec, found)) = registry.find(line) else {
            return Ok(Dispatch::NoCommand);
        };

        debug!("dispatching `{}` to {}", line, found.recognized_name);
        let args = Self::arguments(found, spec.interpolate, spec.arity)?;
        let handler = Rc::clone(&spec.handler);
        let outcome = handler(args, ctx)?;
        Ok(Dispatch::Handled(outcome))
    }

    fn arguments(
        found: MatchResult,
        interpolate: bool,
        arity: Arity,
    ) -> Result<Vec<Option<String>>> {
        let mut args = if interpolate {
            match found.captures.into_iter().flatten().next() {
                Some(text) => shell_words(&text)?.into_iter().map(Some).collect(),
                None => Vec::new(),
            }
        } else {
            found.captures
        };

        if let Arity::Fixed(n) = arity {
            args.resize(n, None);
        }
        Ok(args)
    }
}

/// Split `input` into words the way a POSIX shell would, without any
/// expansion.
///
/// Single quotes are literal, double quotes honour backslash escapes, and
/// a backslash outside quotes escapes the next character.
pub fn shell_words(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(ReplError::malformed("Unmatched ' in arguments")),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(ReplError::malformed("Unmatched \" in arguments")),
                        },
                        Some(c) => word.push(c),
                        None => return Err(ReplError::malformed("Unmatched \" in arguments")),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    word.push(c);
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }

    if in_word {
        words.push(word);
    }
    Ok(words)
}
