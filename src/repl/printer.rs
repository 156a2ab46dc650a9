//! Default result printer

use std::io::{self, Write};

use owo_colors::OwoColorize;

use super::backend_trait::Printer;
use super::error::EvalError;
use super::value::Value;

/// Prints values as `=> value` and errors as `Kind: message`
#[derive(Debug, Clone, Default)]
pub struct DefaultPrinter {
    colors: bool,
}

impl DefaultPrinter {
    /// Create a printer
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }
}

impl Printer for DefaultPrinter {
    fn print(
        &mut self,
        out: &mut dyn Write,
        result: &Result<Value, EvalError>,
    ) -> io::Result<()> {
        match result {
            Ok(value) if self.colors => writeln!(out, "=> {}", value.inspect().cyan()),
            Ok(value) => writeln!(out, "=> {}", value.inspect()),
            Err(err) => {
                if self.colors {
                    writeln!(out, "{}: {}", err.kind.red(), err.message)?;
                } else {
                    writeln!(out, "{}", err)?;
                }
                if let Some(location) = &err.location {
                    writeln!(out, "from {}", location)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: Result<Value, EvalError>) -> String {
        let mut out = Vec::new();
        DefaultPrinter::new(false).print(&mut out, &result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_value() {
        assert_eq!(render(Ok(Value::from("x"))), "=> \"x\"\n");
        assert_eq!(render(Ok(Value::Int(3))), "=> 3\n");
    }

    #[test]
    fn test_print_error_with_location() {
        let err = EvalError::new("NameError", "undefined local variable `y`").at("(repl):1");
        assert_eq!(
            render(Err(err)),
            "NameError: undefined local variable `y`\nfrom (repl):1\n"
        );
    }
}
