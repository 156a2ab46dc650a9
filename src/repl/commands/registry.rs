//! Command Registry
//!
//! Commands are kept in registration order. Matching walks that order and
//! the first matcher that recognises the line wins.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use regex::Regex;

use super::{CommandContext, CommandOutcome};
use crate::repl::error::{ReplError, Result};

/// Handler signature: positional arguments (absent ones are `None`) and
/// the command context.
pub type HandlerFn = Rc<dyn Fn(Vec<Option<String>>, &mut CommandContext<'_>) -> Result<CommandOutcome>>;

/// How many positional arguments a handler takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many slots, padded with `None`
    Fixed(usize),
    /// Every token
    Variadic,
}

/// A successful match of a line against a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Name of the command that matched
    pub recognized_name: String,
    /// Argument text (name matchers) or capture groups (pattern matchers)
    pub captures: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Name,
    Pattern(Regex),
}

/// Decides whether a line invokes a command
#[derive(Debug, Clone)]
pub struct CommandMatcher {
    name: String,
    kind: MatcherKind,
}

impl CommandMatcher {
    /// Matches `name`, optionally followed by whitespace and arguments.
    ///
    /// `name` must not run straight into another non-space character, so
    /// `players` does not invoke `play`.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MatcherKind::Name,
        }
    }

    /// Matches `pattern`; its capture groups become the arguments
    pub fn pattern(
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ReplError::malformed(format!("Invalid command pattern: {}", e)))?;
        Ok(Self {
            name: name.into(),
            kind: MatcherKind::Pattern(regex),
        })
    }

    /// Name the command is listed under
    pub fn command_name(&self) -> &str {
        &self.name
    }

    /// Whether captures are produced by a pattern
    pub fn is_pattern(&self) -> bool {
        matches!(self.kind, MatcherKind::Pattern(_))
    }

    /// Try to recognise `line`
    pub fn recognize(
        &self,
        line: &str,
    ) -> Option<MatchResult> {
        let captures = match &self.kind {
            MatcherKind::Name => {
                let rest = line.strip_prefix(self.name.as_str())?;
                if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
                    return None;
                }
                let args = rest.trim();
                vec![(!args.is_empty()).then(|| args.to_string())]
            }
            MatcherKind::Pattern(regex) => {
                let caps = regex.captures(line)?;
                caps.iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect()
            }
        };
        Some(MatchResult {
            recognized_name: self.name.clone(),
            captures,
        })
    }
}

impl fmt::Display for CommandMatcher {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.kind {
            MatcherKind::Name => write!(f, "{}", self.name),
            MatcherKind::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// A registered command
#[derive(Clone)]
pub struct CommandSpec {
    /// How lines are recognised
    pub matcher: CommandMatcher,
    /// One-line description
    pub help: String,
    /// Positional argument count
    pub arity: Arity,
    /// Split arguments into shell words; when false, captures are passed
    /// verbatim
    pub interpolate: bool,
    /// The command this one is an alias of
    pub alias_of: Option<String>,
    /// What runs
    pub handler: HandlerFn,
}

impl CommandSpec {
    /// A command matched by name whose arguments are split into words
    pub fn new<F>(
        name: &str,
        help: &str,
        arity: Arity,
        handler: F,
    ) -> Self
    where
        F: Fn(Vec<Option<String>>, &mut CommandContext<'_>) -> Result<CommandOutcome> + 'static,
    {
        Self {
            matcher: CommandMatcher::name(name),
            help: help.to_string(),
            arity,
            interpolate: true,
            alias_of: None,
            handler: Rc::new(handler),
        }
    }

    /// Use `matcher` instead of the plain name; captures are passed verbatim
    pub fn with_matcher(
        mut self,
        matcher: CommandMatcher,
    ) -> Self {
        self.matcher = matcher;
        self.interpolate = false;
        self
    }

    /// Name the command is listed under
    pub fn name(&self) -> &str {
        self.matcher.command_name()
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("matcher", &self.matcher)
            .field("help", &self.help)
            .field("arity", &self.arity)
            .field("interpolate", &self.interpolate)
            .field("alias_of", &self.alias_of)
            .finish_non_exhaustive()
    }
}

/// All registered commands, in registration order
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, CommandSpec>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. A command with the same name is replaced in place.
    pub fn register(
        &mut self,
        spec: CommandSpec,
    ) {
        self.commands.insert(spec.name().to_string(), spec);
    }

    /// Register `matcher` as another way to invoke `target`.
    ///
    /// The alias shares the target's handler and arity. Aliases of aliases
    /// point at the original command.
    pub fn alias(
        &mut self,
        matcher: CommandMatcher,
        target: &str,
    ) -> Result<()> {
        let original = self
            .commands
            .get(target)
            .ok_or_else(|| ReplError::UnknownCommand(target.to_string()))?;
        let root = original.alias_of.clone().unwrap_or_else(|| target.to_string());

        let interpolate = if matcher.is_pattern() {
            false
        } else {
            original.interpolate
        };
        let spec = CommandSpec {
            help: format!("Alias for `{}`", root),
            arity: original.arity,
            interpolate,
            alias_of: Some(root),
            handler: Rc::clone(&original.handler),
            matcher,
        };
        self.register(spec);
        Ok(())
    }

    /// Register `name` as an alias of `target`
    pub fn alias_name(
        &mut self,
        name: &str,
        target: &str,
    ) -> Result<()> {
        self.alias(CommandMatcher::name(name), target)
    }

    /// Remove a command
    pub fn unregister(
        &mut self,
        name: &str,
    ) -> Option<CommandSpec> {
        self.commands.shift_remove(name)
    }

    /// Command registered under `name`
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// First command that recognises `line`
    pub fn find(
        &self,
        line: &str,
    ) -> Option<(&CommandSpec, MatchResult)> {
        self.commands
            .values()
            .find_map(|spec| spec.matcher.recognize(line).map(|found| (spec, found)))
    }

    /// Whether `line` would invoke a command right now
    pub fn matches(
        &self,
        line: &str,
    ) -> bool {
        self.find(line).is_some()
    }

    /// Commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Command names in registration order
    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Aliases registered for `name`
    pub fn aliases_of(
        &self,
        name: &str,
    ) -> Vec<&str> {
        self.commands
            .values()
            .filter(|spec| spec.alias_of.as_deref() == Some(name))
            .map(CommandSpec::name)
            .collect()
    }

    /// Number of commands, aliases included
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(
        _args: Vec<Option<String>>,
        _ctx: &mut CommandContext<'_>,
    ) -> Result<CommandOutcome> {
        Ok(CommandOutcome::Continue)
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandSpec::new("play", "Play", Arity::Variadic, noop));
        registry.register(CommandSpec::new("!", "Clear", Arity::Fixed(0), noop));
        registry
    }

    #[test]
    fn test_name_must_end_at_whitespace() {
        let registry = registry();
        assert!(registry.find("players").is_none());
        assert!(registry.find("play").is_some());
        assert!(registry.find("!!!").is_none());
    }

    #[test]
    fn test_name_captures_argument_text() {
        let registry = registry();
        let (spec, found) = registry.find("play   --lines 1..2 ").unwrap();
        assert_eq!(spec.name(), "play");
        assert_eq!(found.captures, vec![Some("--lines 1..2".to_string())]);

        let (_, bare) = registry.find("play").unwrap();
        assert_eq!(bare.captures, vec![None]);
    }

    #[test]
    fn test_pattern_captures_groups() {
        let matcher = CommandMatcher::pattern("%", r"^%(-?\d+)?(?:\s+(.+))?$").unwrap();
        let found = matcher.recognize("%2 let x = 1").unwrap();
        assert_eq!(
            found.captures,
            vec![Some("2".to_string()), Some("let x = 1".to_string())]
        );
        assert!(matcher.recognize("%x").is_none());
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandSpec::new("a", "first", Arity::Variadic, noop).with_matcher(
            CommandMatcher::pattern("a", "^a").unwrap(),
        ));
        registry.register(CommandSpec::new("ab", "second", Arity::Variadic, noop));
        assert_eq!(registry.find("ab").unwrap().0.help, "first");
    }

    #[test]
    fn test_alias_shares_handler() {
        let mut registry = registry();
        registry.alias_name("replay", "play").unwrap();
        registry.alias_name("again", "replay").unwrap();

        let play = registry.get("play").unwrap();
        let again = registry.get("again").unwrap();
        assert!(Rc::ptr_eq(&play.handler, &again.handler));
        assert_eq!(again.alias_of.as_deref(), Some("play"));
        assert_eq!(again.arity, play.arity);
        assert_eq!(registry.aliases_of("play"), vec!["replay", "again"]);
        assert!(registry.alias_name("x", "missing").is_err());
    }

    #[test]
    fn test_unregister_keeps_order() {
        let mut registry = registry();
        registry.register(CommandSpec::new("show-input", "Show", Arity::Fixed(0), noop));
        registry.unregister("!");
        assert_eq!(registry.names(), vec!["play", "show-input"]);
        assert!(!registry.matches("!"));
    }
}
