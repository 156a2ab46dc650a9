//! External editor process

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::backend_trait::Editor;
use super::commands::shell_words;
use super::error::{ReplError, Result};

/// Runs an editor command such as `vim` or `code --wait`.
///
/// The file is passed as `+LINE PATH`, which vi, emacs, nano and most
/// of their descendants understand.
#[derive(Debug, Clone)]
pub struct ProcessEditor {
    command: String,
}

impl ProcessEditor {
    /// Use `command` to edit files
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// `$VISUAL`, then `$EDITOR`, then `vi`
    pub fn from_env() -> Self {
        let command = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());
        Self::new(command)
    }

    /// The configured command line
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl ProcessEditor {
    /// The command split into program and leading arguments, honouring
    /// shell quoting so paths with spaces survive
    fn program_and_args(&self) -> Result<(String, Vec<String>)> {
        let mut words = shell_words(&self.command)
            .map_err(|e| ReplError::Editor(format!("cannot parse editor command: {}", e)))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| ReplError::Editor("no editor configured".to_string()))?;
        Ok((program, words.collect()))
    }
}

impl Editor for ProcessEditor {
    fn open_for_edit(
        &mut self,
        path: &Path,
        line: usize,
    ) -> Result<()> {
        let (program, args) = self.program_and_args()?;

        debug!("running {} on {}:{}", self.command, path.display(), line);
        let status = Command::new(&program)
            .args(&args)
            .arg(format!("+{}", line.max(1)))
            .arg(path)
            .status()
            .map_err(|e| ReplError::Editor(format!("{}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ReplError::Editor(format!("{} exited with {}", program, status)))
        }
    }
}
