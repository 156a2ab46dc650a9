//! REPL Session Engine
//!
//! Drives the read-eval-print loop. Every call to [`SessionEngine::repl`]
//! is one session: it pushes itself on the session stack, reads and
//! dispatches lines until a [`BreakoutSignal`] arrives, then pops itself.
//! `cd` recurses into a nested `repl` on the same thread, so unwinding
//! several sessions is just returning the signal up the call chain.

pub mod context;

pub use context::EngineContext;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use owo_colors::OwoColorize;
use tracing::{debug, warn};

use super::backend_trait::{Editor, Evaluator, Printer};
use super::buffer::ExpressionBuffer;
use super::commands::{CommandContext, CommandDispatcher, CommandOutcome, CommandRegistry, CommandSettings, Dispatch};
use super::editor::ProcessEditor;
use super::error::{EvalError, ReplError, Result};
use super::history::HistoryStore;
use super::input::{InputChain, InputOrigin, InputSource};
use super::printer::DefaultPrinter;
use super::range::IndexBase;
use super::session::{BreakoutSignal, SessionStack};
use super::value::Value;
use crate::util::config::ReplConfig;

/// Renders a prompt from the session target and nesting level
pub type PromptFn = Box<dyn Fn(&Value, usize) -> String>;

/// Called with the output sink, the session target and its level
pub type HookFn = Box<dyn FnMut(&mut dyn Write, &Value, usize)>;

/// The prompt for a fresh expression and the one for continuation lines
pub struct PromptPair {
    first: PromptFn,
    continuation: PromptFn,
}

impl PromptPair {
    /// Build from two prompt functions
    pub fn new(
        first: PromptFn,
        continuation: PromptFn,
    ) -> Self {
        Self {
            first,
            continuation,
        }
    }

    /// `name(target)> ` and `name(target)* `, with `:level` when nested
    pub fn standard(name: &str) -> Self {
        let first_name = name.to_string();
        let continuation_name = name.to_string();
        Self {
            first: Box::new(move |target, level| Self::render(&first_name, target, level, '>')),
            continuation: Box::new(move |target, level| {
                Self::render(&continuation_name, target, level, '*')
            }),
        }
    }

    fn render(
        name: &str,
        target: &Value,
        level: usize,
        mark: char,
    ) -> String {
        if level == 0 {
            format!("{}({}){} ", name, target.inspect(), mark)
        } else {
            format!("{}({}):{}{} ", name, target.inspect(), level, mark)
        }
    }

    /// Prompt shown when the buffer is empty
    pub fn first(
        &self,
        target: &Value,
        level: usize,
    ) -> String {
        (self.first)(target, level)
    }

    /// Prompt shown while an expression is incomplete
    pub fn continuation(
        &self,
        target: &Value,
        level: usize,
    ) -> String {
        (self.continuation)(target, level)
    }
}

impl Default for PromptPair {
    fn default() -> Self {
        Self::standard(crate::NAME)
    }
}

impl std::fmt::Debug for PromptPair {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PromptPair").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Hooks {
    before_session: Vec<HookFn>,
    after_session: Vec<HookFn>,
}

/// Session Engine
///
/// Owns the loop state shared by all nested sessions: input, history,
/// commands and the evaluator.
pub struct SessionEngine<E: Evaluator> {
    evaluator: E,
    printer: Box<dyn Printer>,
    editor: Box<dyn Editor>,
    input: InputChain,
    output: Box<dyn Write>,
    registry: CommandRegistry,
    history: HistoryStore,
    sessions: SessionStack,
    buffer: ExpressionBuffer,
    context: EngineContext,
    prompts: PromptPair,
    settings: CommandSettings,
    history_file: Option<PathBuf>,
    load_on_start: bool,
    save_on_exit: bool,
    hooks: Hooks,
}

impl<E: Evaluator> SessionEngine<E> {
    /// Create an engine reading from `input` and writing to `output`, with
    /// the built-in commands and no history file.
    pub fn new(
        evaluator: E,
        input: Box<dyn InputSource>,
        output: Box<dyn Write>,
    ) -> Self {
        Self {
            evaluator,
            printer: Box::new(DefaultPrinter::default()),
            editor: Box::new(ProcessEditor::from_env()),
            input: InputChain::new(input),
            output,
            registry: CommandRegistry::builtin(),
            history: HistoryStore::new(),
            sessions: SessionStack::new(),
            buffer: ExpressionBuffer::new(),
            context: EngineContext::new(),
            prompts: PromptPair::default(),
            settings: CommandSettings::default(),
            history_file: None,
            load_on_start: true,
            save_on_exit: true,
            hooks: Hooks::default(),
        }
    }

    /// Apply the `[repl]` settings
    pub fn with_config(
        mut self,
        config: &ReplConfig,
    ) -> Self {
        self.prompts = PromptPair::standard(&config.prompt_name);
        self.settings = CommandSettings {
            index_base: IndexBase::from_base_one(config.base_one),
            colors: config.colors,
        };
        self.printer = Box::new(DefaultPrinter::new(config.colors));
        if let Some(command) = &config.editor {
            self.editor = Box::new(ProcessEditor::new(command.clone()));
        }
        self.history_file = config.history_file.clone();
        self.load_on_start = config.load_history;
        self.save_on_exit = config.save_history;
        self
    }

    /// Use `registry` instead of the built-in commands
    pub fn with_registry(
        mut self,
        registry: CommandRegistry,
    ) -> Self {
        self.registry = registry;
        self
    }

    /// Use a different printer
    pub fn with_printer(
        mut self,
        printer: impl Printer + 'static,
    ) -> Self {
        self.printer = Box::new(printer);
        self
    }

    /// Use a different editor
    pub fn with_editor(
        mut self,
        editor: impl Editor + 'static,
    ) -> Self {
        self.editor = Box::new(editor);
        self
    }

    /// Use different prompts
    pub fn with_prompts(
        mut self,
        prompts: PromptPair,
    ) -> Self {
        self.prompts = prompts;
        self
    }

    /// Load history from and save it to `path`
    pub fn with_history_file(
        mut self,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Run `hook` before every session starts
    pub fn on_before_session(
        mut self,
        hook: impl FnMut(&mut dyn Write, &Value, usize) + 'static,
    ) -> Self {
        self.hooks.before_session.push(Box::new(hook));
        self
    }

    /// Run `hook` after every session ends
    pub fn on_after_session(
        mut self,
        hook: impl FnMut(&mut dyn Write, &Value, usize) + 'static,
    ) -> Self {
        self.hooks.after_session.push(Box::new(hook));
        self
    }

    /// The evaluator
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// The evaluator, mutably
    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    /// Input history
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Registered commands, mutably
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Running sessions
    pub fn sessions(&self) -> &SessionStack {
        &self.sessions
    }

    /// The pending expression
    pub fn buffer(&self) -> &ExpressionBuffer {
        &self.buffer
    }

    /// Results of the last evaluations
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// The input chain, e.g. to inject a script before starting
    pub fn input_mut(&mut self) -> &mut InputChain {
        &mut self.input
    }

    /// The configured history file, if persistence is still enabled
    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    /// Run the outermost session on `target` with history loaded before
    /// and saved after.
    pub fn start(
        &mut self,
        target: Value,
    ) -> Value {
        self.load_history();
        let result = match self.repl(target) {
            Ok(value) => value,
            Err(signal) => {
                debug!("breakout to level {} left the engine", signal.target_depth);
                Value::Nil
            }
        };
        self.save_history();
        result
    }

    /// Run one session on `target` until it is broken out of.
    ///
    /// Returns the target when this session is the one the signal names,
    /// otherwise hands the signal back so the enclosing session ends too.
    pub fn repl(
        &mut self,
        target: Value,
    ) -> std::result::Result<Value, BreakoutSignal> {
        let level = self.sessions.len();
        self.run_hooks(HookPoint::Before, &target, level);

        let id = self.sessions.push(target.clone()).id;
        let saved_buffer = std::mem::take(&mut self.buffer);
        debug!("session {} started at level {}", id, level);

        let signal = loop {
            if let Err(signal) = self.step() {
                break signal;
            }
        };

        self.sessions.pop();
        self.buffer = saved_buffer;
        debug!("session {} ended, unwinding to level {}", id, signal.target_depth);
        self.run_hooks(HookPoint::After, &target, level);

        if signal.target_depth == level {
            Ok(target)
        } else {
            Err(signal)
        }
    }

    /// Read, dispatch and maybe evaluate one line
    fn step(&mut self) -> std::result::Result<(), BreakoutSignal> {
        let level = self.sessions.level().unwrap_or(0);
        let target = self.current_target();
        let prompt = if self.buffer.is_empty() {
            self.prompts.first(&target, level)
        } else {
            self.prompts.continuation(&target, level)
        };

        let (line, origin) = match self.input.read_line(&prompt) {
            Ok(Some(read)) => read,
            Ok(None) => return Err(BreakoutSignal::to_depth(level)),
            // Ctrl-C abandons the line, not the session
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                if let Err(e) = writeln!(self.output, "(Interrupted)") {
                    warn!("Failed to write to output: {}", e);
                }
                return Ok(());
            }
            Err(e) => {
                self.report(&ReplError::Io(e));
                return Err(BreakoutSignal::to_depth(level));
            }
        };
        let line = line.trim_end_matches(['\n', '\r']).to_string();

        let line_index = (origin == InputOrigin::Interactive && !line.trim().is_empty())
            .then(|| self.history.push(line.as_str()));

        match self.dispatch(&line, line_index) {
            Ok(Dispatch::NoCommand) => self.buffer.push_line(&line),
            Ok(Dispatch::Handled(CommandOutcome::Continue)) => {}
            Ok(Dispatch::Handled(CommandOutcome::Breakout(signal))) => return Err(signal),
            Ok(Dispatch::Handled(CommandOutcome::Nest(expr))) => return self.nest(&expr),
            Err(e) => {
                self.report(&e);
                return Ok(());
            }
        }

        if self.buffer.as_str().trim().is_empty() {
            self.buffer.clear();
        } else if self.evaluator.is_complete(self.buffer.as_str()) {
            self.eval_buffer();
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        line: &str,
        line_index: Option<usize>,
    ) -> Result<Dispatch> {
        let mut ctx = CommandContext {
            output: self.output.as_mut(),
            buffer: &mut self.buffer,
            history: &mut self.history,
            registry: &self.registry,
            sessions: &self.sessions,
            input: &mut self.input,
            editor: self.editor.as_mut(),
            evaluator: &self.evaluator,
            settings: self.settings,
            line_index,
        };
        CommandDispatcher::dispatch(line, &mut ctx)
    }

    /// Evaluate `expr` and run a nested session on the result
    fn nest(
        &mut self,
        expr: &str,
    ) -> std::result::Result<(), BreakoutSignal> {
        let target = self.current_target();
        match self.evaluator.evaluate(expr, &target, &self.context) {
            Ok(value) => {
                self.repl(value)?;
            }
            Err(error) => self.print_result(&Err(error)),
        }
        Ok(())
    }

    /// Evaluate and clear the buffer
    fn eval_buffer(&mut self) {
        let source = self.buffer.take();
        let session = self.sessions.current().map(|session| session.id);
        let target = self.current_target();

        let start = Instant::now();
        let result = self.evaluator.evaluate(&source, &target, &self.context);
        let elapsed = start.elapsed();

        self.print_result(&result);
        match result {
            Ok(value) => self.context.record_success(session, value, elapsed),
            Err(error) => self.context.record_failure(error, elapsed),
        }
    }

    fn print_result(
        &mut self,
        result: &std::result::Result<Value, EvalError>,
    ) {
        if let Err(e) = self.printer.print(self.output.as_mut(), result) {
            warn!("Failed to print result: {}", e);
        }
    }

    /// Report a command or I/O error and carry on
    fn report(
        &mut self,
        error: &ReplError,
    ) {
        debug!("reporting {:?}", error);
        let written = if self.settings.colors {
            writeln!(self.output, "{} {}", "Error:".red(), error)
        } else {
            writeln!(self.output, "Error: {}", error)
        };
        if let Err(e) = written {
            warn!("Failed to report error: {}", e);
        }
    }

    fn current_target(&self) -> Value {
        self.sessions
            .current()
            .map(|session| session.target.clone())
            .unwrap_or_default()
    }

    fn run_hooks(
        &mut self,
        point: HookPoint,
        target: &Value,
        level: usize,
    ) {
        let hooks = match point {
            HookPoint::Before => &mut self.hooks.before_session,
            HookPoint::After => &mut self.hooks.after_session,
        };
        for hook in hooks.iter_mut() {
            hook(self.output.as_mut(), target, level);
        }
    }

    /// Seed history from the history file, if loading is enabled
    pub fn load_history(&mut self) {
        if !self.load_on_start {
            return;
        }
        let Some(path) = self.history_file.clone() else {
            return;
        };
        match self.history.load(&path) {
            Ok(count) => debug!("history: {} lines from {}", count, path.display()),
            Err(e) => self.persistence_failed(e),
        }
    }

    /// Append new history lines to the history file, if saving is enabled
    pub fn save_history(&mut self) {
        if !self.save_on_exit {
            return;
        }
        let Some(path) = self.history_file.clone() else {
            return;
        };
        match self.history.save(&path) {
            Ok(count) => debug!("history: {} lines saved to {}", count, path.display()),
            Err(e) => self.persistence_failed(e),
        }
    }

    /// Report once, then keep history in memory only
    fn persistence_failed(
        &mut self,
        error: ReplError,
    ) {
        warn!("{}; history is kept in memory only", error);
        self.report(&error);
        self.history_file = None;
    }
}

#[derive(Clone, Copy)]
enum HookPoint {
    Before,
    After,
}

impl<E: Evaluator> std::fmt::Debug for SessionEngine<E> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("sessions", &self.sessions)
            .field("buffer", &self.buffer)
            .field("history_file", &self.history_file)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
