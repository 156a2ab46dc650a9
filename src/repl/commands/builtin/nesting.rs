//! Session navigation commands

use std::cmp::Ordering;

use crate::repl::commands::{Arity, CommandContext, CommandMatcher, CommandOutcome, CommandRegistry, CommandSpec};
use crate::repl::error::{ReplError, Result};
use crate::repl::session::BreakoutSignal;

pub(super) fn register(registry: &mut CommandRegistry) {
    let cd = CommandSpec::new(
        "cd",
        "Start a session on the value of an expression. `cd ..` goes back one level, `cd /` to the top.",
        Arity::Fixed(1),
        cd,
    );
    match CommandMatcher::pattern("cd", r"^cd(?:\s+(.+?))?\s*$") {
        Ok(matcher) => registry.register(cd.with_matcher(matcher)),
        Err(e) => tracing::error!("cd not registered: {}", e),
    }

    registry.register(CommandSpec::new(
        "nesting",
        "Show the running sessions.",
        Arity::Fixed(0),
        nesting,
    ));
    registry.register(CommandSpec::new(
        "jump-to",
        "Jump to the session at the given nesting level.",
        Arity::Fixed(1),
        jump_to,
    ));
    registry.register(CommandSpec::new(
        "exit",
        "End the current session.",
        Arity::Fixed(0),
        exit,
    ));
    registry.register(CommandSpec::new(
        "exit-all",
        "End all sessions and leave.",
        Arity::Fixed(0),
        exit_all,
    ));
    if let Err(e) = registry.alias_name("!!!", "exit-all") {
        tracing::error!("!!! not registered: {}", e);
    }
}

fn cd(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let level = ctx.level();
    match args.into_iter().flatten().next().as_deref() {
        None | Some("/") => {
            if level == 0 {
                return Ok(CommandOutcome::Continue);
            }
            Ok(CommandOutcome::Breakout(BreakoutSignal::to_depth(1)))
        }
        Some("..") => Ok(CommandOutcome::Breakout(BreakoutSignal::to_depth(level))),
        Some(expr) => Ok(CommandOutcome::Nest(expr.to_string())),
    }
}

fn nesting(
    _args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let mut listing = String::from("Nesting status:\n--");
    for session in ctx.sessions.iter() {
        listing.push_str(&format!("\n{}. {}", session.depth, session.target.inspect()));
        if session.depth == 0 {
            listing.push_str(" (top level)");
        }
    }
    ctx.say(listing)?;
    Ok(CommandOutcome::Continue)
}

fn jump_to(
    args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    let Some(text) = args.into_iter().flatten().next() else {
        return Err(ReplError::malformed("jump-to needs a nesting level"));
    };
    let target: usize = text
        .parse()
        .map_err(|_| ReplError::malformed(format!("Invalid nest level: {}", text)))?;

    ctx.sessions.breakout_to(target)?;
    let level = ctx.level();
    match target.cmp(&level) {
        Ordering::Equal => {
            ctx.say(format!("Already at nesting level {}", level))?;
            Ok(CommandOutcome::Continue)
        }
        _ => Ok(CommandOutcome::Breakout(BreakoutSignal::to_depth(target + 1))),
    }
}

fn exit(
    _args: Vec<Option<String>>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    Ok(CommandOutcome::Breakout(BreakoutSignal::to_depth(ctx.level())))
}

fn exit_all(
    _args: Vec<Option<String>>,
    _ctx: &mut CommandContext<'_>,
) -> Result<CommandOutcome> {
    Ok(CommandOutcome::Breakout(BreakoutSignal::to_depth(0)))
}
