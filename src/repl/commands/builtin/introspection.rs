//! `help`, `show-command` and `show-method`

use clap::Parser;

use super::{add_line_numbers, parse_flags};
use crate::repl::commands::{Arity, CommandContext, CommandOutcome, CommandRegistry, CommandSpec};
use crate::repl::error::{ReplError, Result};

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec::new(
        "show-method",
        "Show the source for METH. Type `show-method --help` for more info. Aliases: $, show-source",
        Arity::Variadic,
        show_method,
    ));
    for alias in ["show-source", "$"] {
        if let Err(e) = registry.alias_name(alias, "show-method") {
            tracing::error!("{} not registered: {}", alias, e);
        }
    }
    registry.register(CommandSpec::new(
        "help",
        "Show a list of commands, or help for one command.",
        Arity::Fixed(1),
        help,
    ));
    registry.register(CommandSpec::new(
        "show-command",
        "Show how a command is matched and invoked.",
        Arity::Fixed(1),
        show_command,
    ));
}

/// Look a command up by name, falling back to whatever the name invokes
fn lookup<'r>(
    registry: &'r CommandRegistry,
    name: &str,
) -> Result<&'r CommandSpec> {
    registry
        .get(name)
        .or_else(|| registry.find(name).map(|(spec, _)| spec))
        .ok_or_else(|| ReplError::UnknownCommand(name.to_string()))
}

fn help(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    if let Some(name) = args.into_iter().flatten().next() {
        let spec = lookup(ctx.registry, &name)?;
        let text = format!("{}\n{}", spec.name(), spec.help);
        ctx.say(text)?;
        return Ok(CommandOutcome::Continue);
    }

    let width = ctx
        .registry
        .iter()
        .map(|spec| spec.name().len())
        .max()
        .unwrap_or(0);
    let mut listing = String::from("Commands:");
    for spec in ctx.registry.iter() {
        listing.push_str(&format!("\n  {:<width$}  {}", spec.name(), spec.help, width = width));
    }
    ctx.say(listing)?;
    Ok(CommandOutcome::Continue)
}

fn show_command(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(name) = args.into_iter().flatten().next() else {
        return Err(ReplError::malformed("show-command needs a command name"));
    };
    let spec = lookup(ctx.registry, &name)?;

    let arity = match spec.arity {
        Arity::Fixed(n) => n.to_string(),
        Arity::Variadic => "any".to_string(),
    };
    let mut text = format!(
        "Command: {}\nMatcher: {}\nArguments: {}\nSplit into words: {}",
        spec.name(),
        spec.matcher,
        arity,
        if spec.interpolate { "yes" } else { "no" },
    );
    if let Some(root) = &spec.alias_of {
        text.push_str(&format!("\nAlias of: {}", root));
    }
    let aliases = ctx.registry.aliases_of(spec.name());
    if !aliases.is_empty() {
        text.push_str(&format!("\nAliases: {}", aliases.join(", ")));
    }
    ctx.say(text)?;
    Ok(CommandOutcome::Continue)
}

/// Show the source for each METH, as known to the evaluator
#[derive(Parser, Debug)]
#[command(name = "show-method", disable_version_flag = true)]
struct ShowMethodArgs {
    /// Method names
    #[arg(value_name = "METH", required = true)]
    methods: Vec<String>,

    /// Show line numbers, starting at the input buffer's first line number
    #[arg(short, long = "line-numbers")]
    line_numbers: bool,

    /// Show line numbers starting at 1, as `play --lines` counts them
    #[arg(short, long = "base-one")]
    base_one: bool,
}

fn show_method(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(opts) = parse_flags::<ShowMethodArgs>("show-method", args, ctx)? else {
        return Ok(CommandOutcome::Continue);
    };

    let first = if opts.base_one {
        Some(1)
    } else if opts.line_numbers {
        Some(ctx.settings.index_base.first())
    } else {
        None
    };

    let target = ctx.target();
    for name in &opts.methods {
        let Some(code) = ctx.evaluator.source_for(name, &target) else {
            ctx.say(format!(
                "Invalid method name: {}. Type `show-method --help` for help",
                name
            ))?;
            continue;
        };

        let code = code.trim_end_matches('\n');
        ctx.say(format!("From: {}\nNumber of lines: {}\n", name, code.lines().count()))?;
        let body = match first {
            Some(first) => add_line_numbers(
                code.lines().enumerate().map(|(i, line)| (i + first, line)),
                ctx.settings.colors,
            ),
            None => code.to_string(),
        };
        ctx.say(body)?;
    }
    Ok(CommandOutcome::Continue)
}
