//! nestrepl
//!
//! A nestable read-eval-print loop engine. It intercepts meta-commands
//! (`!`, `show-input`, `amend-line`, `hist`, `play`, `edit`, `cd`, ...)
//! before input reaches the evaluator, collects multi-line expressions,
//! and keeps a history file that several processes can share safely.
//!
//! # Example
//!
//! ```no_run
//! use nestrepl::calc::Calculator;
//! use nestrepl::repl::{ScriptInput, SessionEngine, Value};
//!
//! let input = ScriptInput::new("let x = 2\n(x +\n40)\n");
//! let mut engine = SessionEngine::new(Calculator::new(), Box::new(input), Box::new(std::io::stdout()));
//! engine.start(Value::main());
//! ```

#![warn(rust_2018_idioms)]

pub mod calc;
pub mod repl;
pub mod util;

// Re-exports
pub use repl::{Evaluator, ReplError, SessionEngine, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name used in prompts and the config directory
pub const NAME: &str = "nestrepl";
