//! REPL Values
//!
//! The value type exchanged between the engine and its evaluator. Session
//! targets and evaluation results are both `Value`s; the engine never looks
//! inside them except to render prompts and `=>` output.

use std::fmt;

/// A value produced by (or handed to) an evaluator
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Nil,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Ordered list
    List(Vec<Value>),
    /// An opaque object known only by name
    Object(String),
}

impl Value {
    /// The target of the outermost session
    pub fn main() -> Self {
        Value::Object("main".to_string())
    }

    /// Render the value the way `=>` output shows it.
    ///
    /// Strings and containers are shown in their literal form, everything
    /// else in display form.
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(_) => f.write_str(&self.inspect()),
            Value::Object(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_quotes_strings() {
        assert_eq!(Value::from("hi").inspect(), "\"hi\"");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_inspect_nested_list() {
        let list = Value::List(vec![Value::Int(1), Value::from("a"), Value::Nil]);
        assert_eq!(list.inspect(), "[1, \"a\", nil]");
    }

    #[test]
    fn test_main_target() {
        assert_eq!(Value::main().to_string(), "main");
    }
}
