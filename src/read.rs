//! Character cursor shared by the JSON and TOML lexers.

use crate::Error;
use std::fmt;

/// A token together with the position where it starts (1-based).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned<T> {
    pub value: T,
    pub line: usize,
    pub col: usize,
}

impl<T> Spanned<T> {
    pub fn new(value: T, line: usize, col: usize) -> Self {
        Spanned { value, line, col }
    }

    pub fn error(&self, msg: impl Into<String>) -> Error {
        Error::syntax(self.line, self.col, msg)
    }
}

pub(crate) struct Reader<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes `literal` if the remaining input starts with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            for _ in literal.chars() {
                self.next();
            }
            true
        } else {
            false
        }
    }

    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Syntax error at the current position.
    pub fn error(&self, msg: impl Into<String>) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    /// Reads exactly `len` hex digits of a `\u` style escape.
    pub fn hex_escape(&mut self, len: usize) -> Result<u32, Error> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error(format!("expected {} hex digits in escape", len)))?;
            self.next();
            code = code * 16 + digit;
        }
        Ok(code)
    }
}

/// Renders a character for error messages.
pub(crate) struct Shown(pub char);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0.escape_default())
    }
}
