use crate::read::{Reader, Shown, Spanned};
use crate::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    String(String),
    /// Raw numeric lexeme; the parser decides between integer and float.
    Number(String),
    True,
    False,
    Null,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftBrace => f.write_str("`{`"),
            Token::RightBrace => f.write_str("`}`"),
            Token::LeftBracket => f.write_str("`[`"),
            Token::RightBracket => f.write_str("`]`"),
            Token::Comma => f.write_str("`,`"),
            Token::Colon => f.write_str("`:`"),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Number(n) => write!(f, "number `{}`", n),
            Token::True => f.write_str("`true`"),
            Token::False => f.write_str("`false`"),
            Token::Null => f.write_str("`null`"),
            Token::Eof => f.write_str("end of input"),
        }
    }
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

    /// Returns the next token, or `Token::Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Spanned<Token>> {
        while matches!(self.reader.peek(), Some(c) if c.is_whitespace()) {
            self.reader.next();
        }

        let (line, col) = (self.reader.line(), self.reader.column());
        let token = match self.reader.peek() {
            None => Token::Eof,
            Some('"') => Token::String(self.read_string()?),
            Some(c) if c == '-' || c.is_ascii_digit() => Token::Number(self.read_number()?),
            Some(c) => {
                if let Some(token) = self.punctuation(c) {
                    self.reader.next();
                    token
                } else if self.reader.eat("true") {
                    Token::True
                } else if self.reader.eat("false") {
                    Token::False
                } else if self.reader.eat("null") {
                    Token::Null
                } else {
                    return Err(self.reader.error(format!("invalid character {}", Shown(c))));
                }
            }
        };

        Ok(Spanned::new(token, line, col))
    }

    fn punctuation(&self, c: char) -> Option<Token> {
        match c {
            '{' => Some(Token::LeftBrace),
            '}' => Some(Token::RightBrace),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            ',' => Some(Token::Comma),
            ':' => Some(Token::Colon),
            _ => None,
        }
    }

    fn read_string(&mut self) -> Result<String> {
        let (line, col) = (self.reader.line(), self.reader.column());
        self.reader.next();

        let mut out = String::new();
        loop {
            let ch = match self.reader.next() {
                Some(ch) => ch,
                None => return Err(crate::Error::syntax(line, col, "unterminated string")),
            };
            match ch {
                '"' => return Ok(out),
                '\\' => out.push(self.read_escape()?),
                c if (c as u32) < 0x20 => {
                    return Err(self
                        .reader
                        .error(format!("control character {} in string", Shown(c))));
                }
                c => out.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        let escape = self
            .reader
            .next()
            .ok_or_else(|| self.reader.error("unterminated escape sequence"))?;
        match escape {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.read_unicode_escape(),
            other => Err(self
                .reader
                .error(format!("unknown escape sequence \\{}", other.escape_default()))),
        }
    }

    fn read_unicode_escape(&mut self) -> Result<char> {
        let high = self.reader.hex_escape(4)?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.reader.eat("\\u") {
                    return Err(self.reader.error("unpaired surrogate in \\u escape"));
                }
                let low = self.reader.hex_escape(4)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.reader.error("invalid low surrogate in \\u escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.reader.error("unpaired surrogate in \\u escape"));
            }
            code => code,
        };
        char::from_u32(code).ok_or_else(|| self.reader.error("invalid unicode escape"))
    }

    fn read_number(&mut self) -> Result<String> {
        let mut lexeme = String::new();
        if self.reader.peek() == Some('-') {
            self.reader.next();
            lexeme.push('-');
        }

        let leading_zero = self.reader.peek() == Some('0');
        self.digits(&mut lexeme, "expected digit")?;
        if leading_zero && lexeme.trim_start_matches('-').len() > 1 {
            return Err(self.reader.error("number has a leading zero"));
        }

        if self.reader.peek() == Some('.') {
            self.reader.next();
            lexeme.push('.');
            self.digits(&mut lexeme, "expected digit after decimal point")?;
        }

        if let Some(e @ ('e' | 'E')) = self.reader.peek() {
            self.reader.next();
            lexeme.push(e);
            if let Some(sign @ ('+' | '-')) = self.reader.peek() {
                self.reader.next();
                lexeme.push(sign);
            }
            self.digits(&mut lexeme, "expected digit in exponent")?;
        }

        Ok(lexeme)
    }

    /// Appends one or more ASCII digits.
    fn digits(&mut self, lexeme: &mut String, msg: &str) -> Result<()> {
        let start = lexeme.len();
        while let Some(c) = self.reader.peek().filter(char::is_ascii_digit) {
            self.reader.next();
            lexeme.push(c);
        }
        if lexeme.len() == start {
            return Err(self.reader.error(msg));
        }
        Ok(())
    }
}
