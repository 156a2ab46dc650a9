//! `hist`

use clap::Parser;
use regex::Regex;

use super::{add_line_numbers, parse_flags};
use crate::repl::commands::{Arity, CommandContext, CommandOutcome, CommandRegistry, CommandSpec};
use crate::repl::error::{ReplError, Result};
use crate::repl::history::HistoryEntry;
use crate::repl::range::LineRange;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec::new(
        "hist",
        "Show and replay input history. Type `hist --help` for more info.",
        Arity::Variadic,
        hist,
    ));
}

/// Show and replay input history. History indices start at 0.
#[derive(Parser, Debug)]
#[command(name = "hist", disable_version_flag = true)]
struct HistArgs {
    /// Show lines matching this regex
    #[arg(short, long, value_name = "PATTERN")]
    grep: Option<String>,

    /// Replay a line or range of lines, e.g. 3..5
    #[arg(short, long, value_name = "RANGE", allow_hyphen_values = true)]
    replay: Option<String>,

    /// Forget the history of this session
    #[arg(short, long)]
    clear: bool,

    /// Show the first N lines
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "10")]
    head: Option<usize>,

    /// Show the last N lines
    #[arg(short, long, value_name = "N", num_args = 0..=1, default_missing_value = "10")]
    tail: Option<usize>,

    /// Show a line or range of lines
    #[arg(short, long, value_name = "RANGE", allow_hyphen_values = true)]
    show: Option<String>,

    /// Hide lines that invoke commands
    #[arg(short, long)]
    exclude: bool,
}

fn no_lines(range: &LineRange) -> ReplError {
    ReplError::malformed(format!("No history lines in range {}", range))
}

fn hist(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(opts) = parse_flags::<HistArgs>("hist", args, ctx)? else {
        return Ok(CommandOutcome::Continue);
    };

    if opts.clear {
        ctx.history.clear();
        ctx.say("History cleared.")?;
        return Ok(CommandOutcome::Continue);
    }

    if let Some(range) = &opts.replay {
        let range: LineRange = range.parse()?;
        let text = ctx
            .past_history()
            .select(&range)
            .map(|slice| slice.joined())
            .ok_or_else(|| no_lines(&range))?;
        ctx.input.inject(&text);
        return Ok(CommandOutcome::Continue);
    }

    let pattern = opts
        .grep
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| ReplError::malformed(format!("Invalid --grep pattern: {}", e)))?;

    let past = ctx.past_history();
    let slice = if let Some(n) = opts.head {
        past.head(n)
    } else if let Some(n) = opts.tail {
        past.tail(n)
    } else if let Some(range) = &opts.show {
        let range: LineRange = range.parse()?;
        past.select(&range).ok_or_else(|| no_lines(&range))?
    } else {
        past
    };

    let mut entries: Vec<HistoryEntry<'_>> = match &pattern {
        Some(pattern) => slice.grep(pattern),
        None => slice.entries().collect(),
    };
    if opts.exclude {
        entries.retain(|entry| !ctx.registry.matches(entry.line));
    }

    let listing = add_line_numbers(
        entries.iter().map(|entry| (entry.index, entry.line)),
        ctx.settings.colors,
    );
    if !listing.is_empty() {
        ctx.say(listing)?;
    }
    Ok(CommandOutcome::Continue)
}
