//! nestrepl - CLI

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nestrepl::calc::Calculator;
use nestrepl::repl::{HistoryStore, InputSource, LineEditorInput, ReaderInput, ScriptInput, SessionEngine, Value};
use nestrepl::util::config::{load_config_from, load_user_config, UserConfig};
use nestrepl::util::logger::{self, LogLevel};
use nestrepl::{NAME, VERSION};
use tracing::debug;

/// A nestable calculator REPL with meta-commands and shared history
#[derive(Parser, Debug)]
#[command(name = "nestrepl")]
#[command(version = VERSION)]
#[command(about, long_about = None)]
struct Args {
    /// Read input from this file instead of the terminal
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// History file to load and append to
    #[arg(long, value_name = "FILE")]
    history_file: Option<PathBuf>,

    /// Keep history in memory only (implied by SCRIPT)
    #[arg(long)]
    no_history: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Number input buffer lines from 0
    #[arg(long)]
    base_zero: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> Result<UserConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => load_user_config().context("Failed to load user config")?,
    };

    let repl = &mut config.repl;
    if args.history_file.is_some() {
        repl.history_file = args.history_file.clone();
    }
    if args.no_history || args.script.is_some() {
        repl.load_history = false;
        repl.save_history = false;
    }
    if args.no_color || !io::stdout().is_terminal() {
        repl.colors = false;
    }
    if args.base_zero {
        repl.base_one = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_with_level(LogLevel::from_verbosity(args.verbose));

    let mut config = load_config(&args)?;
    config.repl.history_file = config.repl.history_path();
    debug!("{} {} with {:?}", NAME, VERSION, config.repl);

    let input: Box<dyn InputSource> = match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script: {}", path.display()))?;
            Box::new(ScriptInput::new(&text))
        }
        None if io::stdin().is_terminal() => {
            let commands = nestrepl::repl::CommandRegistry::builtin().names();
            let mut line_input = LineEditorInput::new(commands, config.repl.vi_mode)
                .context("Failed to start the line editor")?;
            if let Some(path) = config.repl.history_file.as_deref().filter(|_| config.repl.load_history) {
                let mut recall = HistoryStore::new();
                if recall.load(path).is_ok() {
                    line_input.seed_history(recall.lines());
                }
            }
            Box::new(line_input)
        }
        None => Box::new(ReaderInput::new(io::BufReader::new(io::stdin()))),
    };

    let mut engine = SessionEngine::new(Calculator::new(), input, Box::new(io::stdout())).with_config(&config.repl);
    engine.start(Value::main());
    Ok(())
}
