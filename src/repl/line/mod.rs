//! Line editing with rustyline
//!
//! [`LineEditorInput`] is the interactive [`InputSource`]: it shows the
//! prompt, offers in-memory recall and completes command names. Recall is
//! separate from the engine's own history, which is what gets persisted.

use std::io;

use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, EditMode, Editor};
use tracing::debug;

use super::input::InputSource;

mod completer;
pub use completer::CommandCompleter;

/// Terminal input through rustyline
pub struct LineEditorInput {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl LineEditorInput {
    /// Create an editor completing `commands`
    pub fn new(
        commands: Vec<String>,
        vi_mode: bool,
    ) -> io::Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .edit_mode(if vi_mode { EditMode::Vi } else { EditMode::Emacs })
            .build();

        let mut editor = Editor::with_config(config)
            .map_err(|e| io::Error::other(format!("Readline error: {}", e)))?;
        editor.set_helper(Some(CommandCompleter::new(commands)));
        Ok(Self { editor })
    }

    /// Make `lines` available to up-arrow recall
    pub fn seed_history<'l>(
        &mut self,
        lines: impl IntoIterator<Item = &'l String>,
    ) {
        for line in lines {
            if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                debug!("could not seed recall history: {}", e);
                return;
            }
        }
    }
}

impl InputSource for LineEditorInput {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        debug!("could not add recall entry: {}", e);
                    }
                }
                Ok(Some(line))
            }
            // Ctrl-D
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C; the engine reports it
            Err(ReadlineError::Interrupted) => Err(io::Error::from(io::ErrorKind::Interrupted)),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl std::fmt::Debug for LineEditorInput {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LineEditorInput").finish_non_exhaustive()
    }
}
