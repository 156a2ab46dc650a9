//! Command Completer
//!
//! Completes command names at the start of the line.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

/// Completes the names of registered commands
#[derive(Debug, Clone, Default)]
pub struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    /// Complete from `commands`
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    /// Names starting with `prefix`, sorted
    pub fn candidates(
        &self,
        prefix: &str,
    ) -> Vec<&str> {
        let mut found: Vec<&str> = self
            .commands
            .iter()
            .map(String::as_str)
            .filter(|name| name.starts_with(prefix))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let prefix = &line[..pos];
        // only the command word is completed
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let candidates = self
            .candidates(prefix)
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates() {
        let completer = CommandCompleter::new(vec![
            "show-input".to_string(),
            "show-command".to_string(),
            "hist".to_string(),
        ]);
        assert_eq!(completer.candidates("show"), vec!["show-command", "show-input"]);
        assert!(completer.candidates("x").is_empty());
    }
}
