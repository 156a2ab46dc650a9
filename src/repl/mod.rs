//! REPL Engine
//!
//! A language-agnostic, nestable read-eval-print loop. The engine reads
//! lines, routes `!`, `hist`, `cd` and the other meta-commands to their
//! handlers, collects the rest into a multi-line expression buffer and
//! hands complete expressions to an [`Evaluator`].

pub mod backend_trait;
pub mod buffer;
pub mod commands;
pub mod editor;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod line;
pub mod printer;
pub mod range;
pub mod session;
pub mod value;

pub use backend_trait::{Editor, Evaluator, Printer};
pub use buffer::{Amended, ExpressionBuffer};
pub use commands::{
    Arity, CommandContext, CommandDispatcher, CommandMatcher, CommandOutcome, CommandRegistry, CommandSettings,
    CommandSpec, Dispatch,
};
pub use editor::ProcessEditor;
pub use engine::{EngineContext, PromptPair, SessionEngine};
pub use error::{EvalError, ReplError, Result};
pub use history::{HistoryEntry, HistorySlice, HistoryStore};
pub use input::{InputChain, InputOrigin, InputSource, ReaderInput, ScriptInput};
pub use line::LineEditorInput;
pub use printer::DefaultPrinter;
pub use range::{IndexBase, LineRange};
pub use session::{BreakoutSignal, Session, SessionId, SessionStack};
pub use value::Value;
