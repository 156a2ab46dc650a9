use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use nestrepl::calc::Calculator;
use nestrepl::repl::{Editor, ReplError, ScriptInput, SessionEngine};

/// Output sink the test keeps a handle to
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An engine running the calculator over `script`
pub fn engine(script: &str) -> (SessionEngine<Calculator>, SharedOutput) {
    let out = SharedOutput::default();
    let engine = SessionEngine::new(
        Calculator::new(),
        Box::new(ScriptInput::new(script)),
        Box::new(out.clone()),
    );
    (engine, out)
}

/// Editor that overwrites the file with fixed text, or leaves it alone
#[derive(Default)]
pub struct ScriptedEditor {
    pub replacement: Option<String>,
    pub opened: Rc<RefCell<Vec<usize>>>,
}

impl Editor for ScriptedEditor {
    fn open_for_edit(
        &mut self,
        path: &Path,
        line: usize,
    ) -> Result<(), ReplError> {
        self.opened.borrow_mut().push(line);
        if let Some(text) = &self.replacement {
            std::fs::write(path, text)?;
        }
        Ok(())
    }
}
