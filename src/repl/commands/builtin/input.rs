//! Input buffer commands

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use super::parse_flags;
use crate::repl::buffer::Amended;
use crate::repl::commands::{Arity, CommandContext, CommandMatcher, CommandOutcome, CommandRegistry, CommandSpec};
use crate::repl::error::{ReplError, Result};
use crate::repl::range::LineRange;

const AMEND_PATTERN: &str = r"^amend-line(?:\s*(-?\d+)(?:\.\.(-?\d+))?)?(?:\s+(.+))?$";
const AMEND_ALIAS_PATTERN: &str = r"^%(?:\s*(-?\d+)(?:\.\.(-?\d+))?)?(?:\s+(.+))?$";

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec::new(
        "!",
        "Clear the input buffer. Useful if the parsing process goes wrong and you get stuck in the read loop.",
        Arity::Fixed(0),
        clear_buffer,
    ));
    registry.register(CommandSpec::new(
        "show-input",
        "Show the contents of the input buffer for the current multi-line expression.",
        Arity::Fixed(0),
        show_input,
    ));

    let amend = CommandSpec::new(
        "amend-line",
        "Amend a line of input in the input buffer. e.g. amend-line 2..3 x + 1, or amend-line 2 ! to delete.",
        Arity::Fixed(3),
        amend_line,
    );
    match CommandMatcher::pattern("amend-line", AMEND_PATTERN) {
        Ok(matcher) => registry.register(amend.with_matcher(matcher)),
        Err(e) => tracing::error!("amend-line not registered: {}", e),
    }
    if let Err(e) = CommandMatcher::pattern("%", AMEND_ALIAS_PATTERN)
        .and_then(|matcher| registry.alias(matcher, "amend-line"))
    {
        tracing::error!("% not registered: {}", e);
    }

    registry.register(CommandSpec::new(
        "play",
        "Play back method source or file lines as input. Type `play --help` for more info.",
        Arity::Variadic,
        play,
    ));
    registry.register(CommandSpec::new(
        "edit",
        "Open a text editor on the input buffer or a file. Type `edit --help` for more info.",
        Arity::Variadic,
        edit,
    ));
}

fn clear_buffer(
    _args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    ctx.buffer.clear();
    ctx.say("Input buffer cleared!")?;
    Ok(CommandOutcome::Continue)
}

fn show_input(
    _args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    if !ctx.buffer.is_empty() {
        let listing = ctx.buffer.numbered(ctx.settings.index_base);
        ctx.say(listing)?;
    }
    Ok(CommandOutcome::Continue)
}

fn parse_index(text: &str) -> Result<isize> {
    text.parse()
        .map_err(|_| ReplError::malformed(format!("Invalid line number: {}", text)))
}

fn amend_line(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let mut args = args.into_iter();
    let start = args.next().flatten();
    let end = args.next().flatten();
    let text = args.next().flatten();

    let range = match (start, end) {
        (None, _) => LineRange::last(),
        (Some(start), None) => LineRange::single(parse_index(&start)?),
        (Some(start), Some(end)) => LineRange::inclusive(parse_index(&start)?, parse_index(&end)?),
    };
    let Some(text) = text else {
        return Err(ReplError::malformed(
            "amend-line needs replacement text, or `!` to delete the lines",
        ));
    };

    match ctx.buffer.amend(&range, ctx.settings.index_base, text.trim_end())? {
        Amended::NothingToAmend => ctx.say("Nothing to amend.")?,
        Amended::Replaced | Amended::Deleted => {
            let listing = ctx.buffer.numbered(ctx.settings.index_base);
            ctx.say(listing)?;
        }
    }
    Ok(CommandOutcome::Continue)
}

/// Play back method source or file lines as input
#[derive(Parser, Debug)]
#[command(name = "play", disable_version_flag = true)]
#[command(group(ArgGroup::new("source").required(true).args(["method", "file"])))]
struct PlayArgs {
    /// Only play these lines, e.g. 2..4
    #[arg(short, long, value_name = "RANGE", allow_hyphen_values = true)]
    lines: Option<String>,

    /// Play the source of this method
    #[arg(short, long, value_name = "NAME")]
    method: Option<String>,

    /// Play the contents of this file
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,
}

fn play(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(opts) = parse_flags::<PlayArgs>("play", args, ctx)? else {
        return Ok(CommandOutcome::Continue);
    };

    let code = if let Some(name) = &opts.method {
        ctx.evaluator
            .source_for(name, &ctx.target())
            .ok_or_else(|| ReplError::malformed(format!("No source found for method `{}`", name)))?
    } else if let Some(path) = &opts.file {
        fs::read_to_string(path)
            .map_err(|e| ReplError::malformed(format!("Cannot read {}: {}", path.display(), e)))?
    } else {
        return Err(ReplError::malformed("play needs --method or --file"));
    };

    let code = match &opts.lines {
        Some(range) => {
            let range: LineRange = range.parse()?;
            let lines: Vec<&str> = code.lines().collect();
            let span = range
                .clamp(lines.len(), ctx.settings.index_base)
                .ok_or_else(|| ReplError::malformed(format!("No lines in range {}", range)))?;
            lines[span].join("\n")
        }
        None => code,
    };

    ctx.input.inject(&code);
    Ok(CommandOutcome::Continue)
}

/// Open a text editor. Without FILE, edits the input buffer.
#[derive(Parser, Debug)]
#[command(name = "edit", disable_version_flag = true)]
struct EditArgs {
    /// File to edit, optionally as FILE:LINE
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Edit an empty temporary file
    #[arg(short, long, conflicts_with_all = ["file", "input"])]
    temp: bool,

    /// Edit history line N in a temporary file
    #[arg(short = 'i', long = "in", value_name = "N", allow_hyphen_values = true, conflicts_with = "file")]
    input: Option<isize>,

    /// Jump to this line in the opened file
    #[arg(short, long, value_name = "LINE")]
    line: Option<usize>,

    /// Don't load the edited text back
    #[arg(short, long = "no-reload")]
    no_reload: bool,

    /// Play an edited FILE back as input
    #[arg(short, long, conflicts_with = "no_reload")]
    reload: bool,
}

fn edit(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(opts) = parse_flags::<EditArgs>("edit", args, ctx)? else {
        return Ok(CommandOutcome::Continue);
    };

    match &opts.file {
        Some(spec) => edit_file(spec, &opts, ctx)?,
        None => edit_input(&opts, ctx)?,
    }
    Ok(CommandOutcome::Continue)
}

fn edit_input(
    opts: &EditArgs,
    ctx: &mut CommandContext<'_>,
) -> Result<()> {
    let content = if opts.temp {
        String::new()
    } else if let Some(n) = opts.input {
        ctx.past_history()
            .select(&LineRange::single(n))
            .map(|slice| slice.joined())
            .ok_or_else(|| ReplError::malformed(format!("No history line {}", n)))?
    } else if !ctx.buffer.as_str().trim().is_empty() {
        ctx.buffer.as_str().to_string()
    } else {
        ctx.past_history()
            .lines()
            .iter()
            .rev()
            .find(|line| !line.trim().is_empty() && !ctx.registry.matches(line))
            .map(|line| format!("{}\n", line))
            .unwrap_or_default()
    };

    let mut file = tempfile::Builder::new()
        .prefix("nestrepl-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    let line = opts.line.unwrap_or_else(|| content.lines().count().max(1));
    ctx.editor.open_for_edit(file.path(), line)?;

    if !opts.no_reload {
        let edited = ctx.editor.read_back(file.path())?;
        ctx.buffer.replace(edited);
    }
    Ok(())
}

fn split_file_line(spec: &str) -> (PathBuf, Option<usize>) {
    if let Some((path, line)) = spec.rsplit_once(':') {
        if let Ok(line) = line.parse() {
            return (PathBuf::from(path), Some(line));
        }
    }
    (PathBuf::from(spec), None)
}

fn edit_file(
    spec: &str,
    opts: &EditArgs,
    ctx: &mut CommandContext<'_>,
) -> Result<()> {
    let (path, line) = split_file_line(spec);
    let line = opts.line.or(line).unwrap_or(1);
    ctx.editor.open_for_edit(&path, line)?;

    if opts.reload {
        let text = ctx.editor.read_back(&path)?;
        ctx.input.inject(&text);
    }
    Ok(())
}
