use crate::read::{Reader, Shown, Spanned};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    LeftBracket,
    RightBracket,
    Dot,
    Equals,
    Comma,
    Newline,
    /// Basic (`"..."`) or literal (`'...'`) string, already unescaped.
    String(String),
    /// Bare key such as `server` or `max-connections`.
    Bare(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftBracket => f.write_str("`[`"),
            Token::RightBracket => f.write_str("`]`"),
            Token::Dot => f.write_str("`.`"),
            Token::Equals => f.write_str("`=`"),
            Token::Comma => f.write_str("`,`"),
            Token::Newline => f.write_str("newline"),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Bare(word) => write!(f, "bare word `{}`", word),
            Token::Integer(i) => write!(f, "integer `{}`", i),
            Token::Float(v) => write!(f, "float `{}`", v),
            Token::Boolean(b) => write!(f, "`{}`", b),
            Token::Timestamp(ts) => write!(f, "timestamp `{}`", ts.to_rfc3339()),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E' | '_' | 'T' | 'Z' | ':')
}

/// A numeric lexeme is a date-time when it holds `T`, `Z` or `:`, or a `-`
/// that is neither a leading sign nor an exponent sign.
fn looks_like_timestamp(lexeme: &str) -> bool {
    if lexeme.contains(['T', 'Z', ':']) {
        return true;
    }
    let chars: Vec<char> = lexeme.chars().collect();
    chars
        .iter()
        .enumerate()
        .skip(1)
        .any(|(i, &c)| c == '-' && !matches!(chars[i - 1], 'e' | 'E'))
}

pub(crate) struct Lexer<'a> {
    reader: Reader<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            reader: Reader::new(input),
        }
    }

    /// Returns the next token. Line breaks are significant and come back as
    /// `Token::Newline`; comments are dropped.
    pub fn next_token(&mut self) -> Result<Spanned<Token>> {
        loop {
            match self.reader.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.reader.next();
                }
                Some('#') => {
                    while !matches!(self.reader.peek(), None | Some('\n')) {
                        self.reader.next();
                    }
                }
                _ => break,
            }
        }

        let (line, col) = (self.reader.line(), self.reader.column());
        let token = match self.reader.peek() {
            None => Token::Eof,
            Some('"') => Token::String(self.read_basic_string()?),
            Some('\'') => Token::String(self.read_literal_string()?),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.read_number(line, col)?,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_word(),
            Some(c) => {
                let token = match c {
                    '\n' => Token::Newline,
                    '[' => Token::LeftBracket,
                    ']' => Token::RightBracket,
                    '.' => Token::Dot,
                    '=' => Token::Equals,
                    ',' => Token::Comma,
                    other => {
                        return Err(self
                            .reader
                            .error(format!("invalid character {}", Shown(other))));
                    }
                };
                self.reader.next();
                token
            }
        };

        Ok(Spanned::new(token, line, col))
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(c) = self.reader.peek().filter(|&c| is_bare_char(c)) {
            self.reader.next();
            word.push(c);
        }
        match word.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            _ => Token::Bare(word),
        }
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<Token> {
        let mut lexeme = String::new();
        while let Some(c) = self.reader.peek().filter(|&c| is_number_char(c)) {
            self.reader.next();
            lexeme.push(c);
        }

        if looks_like_timestamp(&lexeme) {
            return DateTime::parse_from_rfc3339(&lexeme)
                .map(Token::Timestamp)
                .map_err(|e| Error::syntax(line, col, format!("invalid date-time `{}`: {}", lexeme, e)));
        }

        let digits: String = lexeme.chars().filter(|&c| c != '_').collect();
        if digits.contains(['.', 'e', 'E']) {
            match digits.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Token::Float(f)),
                _ => Err(Error::syntax(line, col, format!("invalid float `{}`", lexeme))),
            }
        } else {
            digits
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| Error::syntax(line, col, format!("invalid integer `{}`", lexeme)))
        }
    }

    fn read_basic_string(&mut self) -> Result<String> {
        let (line, col) = (self.reader.line(), self.reader.column());
        self.reader.next();

        let mut out = String::new();
        loop {
            match self.reader.peek() {
                None | Some('\n') => return Err(Error::syntax(line, col, "unterminated string")),
                Some('"') => {
                    self.reader.next();
                    return Ok(out);
                }
                Some('\\') => {
                    self.reader.next();
                    out.push(self.read_escape()?);
                }
                Some(c) if c != '\t' && (c as u32) < 0x20 => {
                    return Err(self
                        .reader
                        .error(format!("control character {} in string", Shown(c))));
                }
                Some(c) => {
                    self.reader.next();
                    out.push(c);
                }
            }
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        let escape = self
            .reader
            .next()
            .ok_or_else(|| self.reader.error("unterminated escape sequence"))?;
        let code = match escape {
            '"' => return Ok('"'),
            '\\' => return Ok('\\'),
            'b' => return Ok('\u{8}'),
            'f' => return Ok('\u{c}'),
            'n' => return Ok('\n'),
            'r' => return Ok('\r'),
            't' => return Ok('\t'),
            'u' => self.reader.hex_escape(4)?,
            'U' => self.reader.hex_escape(8)?,
            other => {
                return Err(self
                    .reader
                    .error(format!("unknown escape sequence \\{}", other.escape_default())));
            }
        };
        char::from_u32(code)
            .ok_or_else(|| self.reader.error(format!("invalid unicode scalar {:#x}", code)))
    }

    fn read_literal_string(&mut self) -> Result<String> {
        let (line, col) = (self.reader.line(), self.reader.column());
        self.reader.next();

        let mut out = String::new();
        loop {
            match self.reader.next() {
                None | Some('\n') => return Err(Error::syntax(line, col, "unterminated string")),
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }
}
