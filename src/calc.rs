//! Calculator
//!
//! A small expression language for the `nestrepl` binary: integers,
//! floats, strings and lists, the four arithmetic operators, `let`
//! bindings, `self` (the session target) and `_` (the last result).

use std::collections::HashMap;
use std::fmt;

use crate::repl::backend_trait::Evaluator;
use crate::repl::engine::EngineContext;
use crate::repl::error::EvalError;
use crate::repl::value::Value;

type EvalResult<T> = Result<T, EvalError>;

fn syntax_error(message: impl Into<String>) -> EvalError {
    EvalError::new("SyntaxError", message)
}

fn overflow() -> EvalError {
    EvalError::new("RangeError", "integer overflow")
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Sym(char),
}

impl fmt::Display for Token {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Token::Int(i) => write!(f, "`{}`", i),
            Token::Float(x) => write!(f, "`{}`", x),
            Token::Str(s) => write!(f, "`{:?}`", s),
            Token::Ident(name) => write!(f, "`{}`", name),
            Token::Sym(c) => write!(f, "`{}`", c),
        }
    }
}

const SYMBOLS: &str = "+-*/()[],=;";

fn tokenize(source: &str) -> EvalResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() {
            let mut text = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' || d == '_' {
                    text.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let text = text.replace('_', "");
            let token = if text.contains('.') {
                text.parse()
                    .map(Token::Float)
                    .map_err(|_| syntax_error(format!("invalid number `{}`", text)))?
            } else {
                text.parse().map(Token::Int).map_err(|_| {
                    EvalError::new("RangeError", format!("integer literal `{}` is too large", text))
                })?
            };
            tokens.push(token);
        } else if c.is_alphabetic() || c == '_' {
            let mut name = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(name));
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(other) => text.push(other),
                        None => return Err(syntax_error("unterminated string")),
                    },
                    Some(other) => text.push(other),
                    None => return Err(syntax_error("unterminated string")),
                }
            }
            tokens.push(Token::Str(text));
        } else if SYMBOLS.contains(c) {
            chars.next();
            tokens.push(Token::Sym(c));
        } else {
            return Err(syntax_error(format!("unexpected character `{}`", c)));
        }
    }

    Ok(tokens)
}

fn float_op(
    op: char,
    a: f64,
    b: f64,
) -> EvalResult<Value> {
    let value = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        _ => return Err(EvalError::new("TypeError", format!("unknown operator {}", op))),
    };
    Ok(Value::Float(value))
}

fn arithmetic(
    op: char,
    left: Value,
    right: Value,
) -> EvalResult<Value> {
    use Value::*;

    match (op, left, right) {
        ('+', Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or_else(overflow),
        ('-', Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or_else(overflow),
        ('*', Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or_else(overflow),
        ('/', Int(_), Int(0)) => Err(EvalError::new("ZeroDivisionError", "divided by 0")),
        ('/', Int(a), Int(b)) => a.checked_div(b).map(Int).ok_or_else(overflow),
        (op, Int(a), Float(b)) => float_op(op, a as f64, b),
        (op, Float(a), Int(b)) => float_op(op, a, b as f64),
        (op, Float(a), Float(b)) => float_op(op, a, b),
        ('+', Str(a), Str(b)) => Ok(Str(a + &b)),
        ('+', List(mut a), List(b)) => {
            a.extend(b);
            Ok(List(a))
        }
        (op, left, right) => Err(EvalError::new(
            "TypeError",
            format!(
                "unsupported operand types for {}: {} and {}",
                op,
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}

/// Recursive descent over one statement's tokens
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    variables: &'a HashMap<String, Value>,
    target: &'a Value,
    last: &'a Value,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn eat(
        &mut self,
        sym: char,
    ) -> bool {
        if self.peek() == Some(&Token::Sym(sym)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        sym: char,
    ) -> EvalResult<()> {
        if self.eat(sym) {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(syntax_error(format!("expected `{}`, found {}", sym, token))),
            None => Err(syntax_error(format!("expected `{}`, found end of input", sym))),
        }
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> EvalResult<Value> {
        let mut left = self.term()?;
        loop {
            let op = if self.eat('+') {
                '+'
            } else if self.eat('-') {
                '-'
            } else {
                return Ok(left);
            };
            let right = self.term()?;
            left = arithmetic(op, left, right)?;
        }
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> EvalResult<Value> {
        let mut left = self.unary()?;
        loop {
            let op = if self.eat('*') {
                '*'
            } else if self.eat('/') {
                '/'
            } else {
                return Ok(left);
            };
            let right = self.unary()?;
            left = arithmetic(op, left, right)?;
        }
    }

    fn unary(&mut self) -> EvalResult<Value> {
        if !self.eat('-') {
            return self.primary();
        }
        match self.unary()? {
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(EvalError::new(
                "TypeError",
                format!("bad operand type for unary -: {}", other.type_name()),
            )),
        }
    }

    fn primary(&mut self) -> EvalResult<Value> {
        let Some(token) = self.advance() else {
            return Err(syntax_error("unexpected end of input"));
        };
        match token {
            Token::Int(i) => Ok(Value::Int(*i)),
            Token::Float(x) => Ok(Value::Float(*x)),
            Token::Str(s) => Ok(Value::Str(s.clone())),
            Token::Ident(name) => self.name(name),
            Token::Sym('(') => {
                let value = self.expr()?;
                self.expect(')')?;
                Ok(value)
            }
            Token::Sym('[') => {
                let mut items = Vec::new();
                if self.eat(']') {
                    return Ok(Value::List(items));
                }
                loop {
                    items.push(self.expr()?);
                    if self.eat(']') {
                        return Ok(Value::List(items));
                    }
                    self.expect(',')?;
                }
            }
            other => Err(syntax_error(format!("unexpected {}", other))),
        }
    }

    fn name(
        &self,
        name: &str,
    ) -> EvalResult<Value> {
        match name {
            "nil" => Ok(Value::Nil),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "self" => Ok(self.target.clone()),
            "_" => Ok(self.last.clone()),
            _ => self.variables.get(name).cloned().ok_or_else(|| {
                EvalError::new("NameError", format!("undefined local variable `{}`", name))
            }),
        }
    }
}

/// The demo evaluator
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    variables: HashMap<String, Value>,
    sources: HashMap<String, String>,
}

impl Calculator {
    /// Create a calculator with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`
    pub fn variable(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Remember `source` as the definition of `name`, for `play --method`
    pub fn define_source(
        &mut self,
        name: &str,
        source: &str,
    ) {
        self.sources.insert(name.to_string(), source.to_string());
    }

    fn run_statement(
        &mut self,
        tokens: &[Token],
        source: &str,
        target: &Value,
        last: &Value,
    ) -> EvalResult<Value> {
        if let [Token::Ident(keyword), Token::Ident(name), Token::Sym('='), rest @ ..] = tokens {
            if keyword == "let" {
                let value = self.eval_tokens(rest, target, last)?;
                self.variables.insert(name.clone(), value.clone());
                self.define_source(name, source.trim_end());
                return Ok(value);
            }
        }
        self.eval_tokens(tokens, target, last)
    }

    fn eval_tokens(
        &self,
        tokens: &[Token],
        target: &Value,
        last: &Value,
    ) -> EvalResult<Value> {
        let mut parser = Parser {
            tokens,
            pos: 0,
            variables: &self.variables,
            target,
            last,
        };
        let value = parser.expr()?;
        match parser.peek() {
            Some(token) => Err(syntax_error(format!("unexpected {}", token))),
            None => Ok(value),
        }
    }
}

impl Evaluator for Calculator {
    fn is_complete(
        &self,
        source: &str,
    ) -> bool {
        let mut brackets = 0;
        let mut parens = 0;
        let mut in_string = false;
        let mut escaped = false;

        for c in source.chars() {
            if escaped {
                escaped = false;
                continue;
            }

            match c {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '[' if !in_string => brackets += 1,
                ']' if !in_string => {
                    // unbalanced close: let the evaluator report it
                    if brackets == 0 {
                        return true;
                    }
                    brackets -= 1;
                }
                '(' if !in_string => parens += 1,
                ')' if !in_string => {
                    if parens == 0 {
                        return true;
                    }
                    parens -= 1;
                }
                _ => {}
            }
        }

        if brackets > 0 || parens > 0 || in_string {
            return false;
        }
        // a trailing operator continues on the next line
        !source
            .trim_end()
            .ends_with(['+', '-', '*', '/', '=', ','])
    }

    fn evaluate(
        &mut self,
        source: &str,
        target: &Value,
        context: &EngineContext,
    ) -> EvalResult<Value> {
        let tokens = tokenize(source)?;
        let last = context.last_result().clone();

        let mut result = Value::Nil;
        for statement in tokens.split(|token| *token == Token::Sym(';')) {
            if statement.is_empty() {
                continue;
            }
            result = self.run_statement(statement, source, target, &last)?;
        }
        Ok(result)
    }

    fn source_for(
        &self,
        name: &str,
        _target: &Value,
    ) -> Option<String> {
        self.sources.get(name).cloned()
    }
}
