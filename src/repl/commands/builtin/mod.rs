//! Built-in commands
//!
//! - [`input`]: `!`, `show-input`, `amend-line` / `%`, `play`, `edit`
//! - [`history`]: `hist`
//! - [`nesting`]: `cd`, `nesting`, `jump-to`, `exit`, `exit-all` / `!!!`
//! - [`introspection`]: `help`, `show-command`

pub mod history;
pub mod input;
pub mod introspection;
pub mod nesting;

use clap::error::ErrorKind;
use clap::Parser;

use super::{CommandContext, CommandRegistry};
use crate::repl::error::{ReplError, Result};

impl CommandRegistry {
    /// A registry holding every built-in command
    pub fn builtin() -> Self {
        let mut registry = CommandRegistry::new();
        register_defaults(&mut registry);
        registry
    }
}

/// Register the built-in commands
pub fn register_defaults(registry: &mut CommandRegistry) {
    input::register(registry);
    history::register(registry);
    nesting::register(registry);
    introspection::register(registry);
}

/// Parse command flags with clap.
///
/// `--help` prints the usage and yields `None`; any other parse failure is
/// a [`ReplError::MalformedCommandArgs`].
pub(crate) fn parse_flags<T: Parser>(
    name: &str,
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<Option<T>> {
    let words = std::iter::once(name.to_string()).chain(args.into_iter().flatten());
    match T::try_parse_from(words) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            ctx.say(e.to_string().trim_end())?;
            Ok(None)
        }
        Err(e) => Err(ReplError::malformed(e.to_string().trim_end().to_string())),
    }
}

/// Prefix every line with its number, starting at `start`
pub(crate) fn add_line_numbers<'l>(
    lines: impl IntoIterator<Item = (usize, &'l str)>,
    colors: bool,
) -> String {
    use owo_colors::OwoColorize;

    let lines: Vec<(usize, &str)> = lines.into_iter().collect();
    let width = lines
        .last()
        .map(|(index, _)| index.to_string().len())
        .unwrap_or(1);
    lines
        .iter()
        .map(|(index, line)| {
            let number = format!("{:>width$}", index, width = width);
            if colors {
                format!("{}: {}", number.blue(), line)
            } else {
                format!("{}: {}", number, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
