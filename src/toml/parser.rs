use super::lexer::{Lexer, Token};
use crate::read::Spanned;
use crate::{CodecOptions, Error, Result, Table, Value};
use indexmap::map::Entry;

/// Statement-oriented TOML parser producing the root table.
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Spanned<Token>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: CodecOptions) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let peeked = lexer.next_token()?;
        Ok(Parser {
            lexer,
            peeked,
            depth: 0,
            max_depth: options.max_depth,
        })
    }

    pub fn parse(mut self) -> Result<Table> {
        let mut root = Table::new();
        // Path of the table opened by the most recent header.
        let mut current: Vec<String> = Vec::new();

        loop {
            let token = self.bump()?;
            match token.value {
                Token::Eof => return Ok(root),
                Token::Newline => continue,
                Token::LeftBracket => {
                    let array = self.peeked.value == Token::LeftBracket;
                    if array {
                        self.bump()?;
                    }
                    let path = self.key_path()?;
                    self.close_header(array)?;
                    self.check_depth(1 + path.len(), &token)?;

                    if array {
                        append_table(&mut root, &path).map_err(|msg| token.error(msg))?;
                    } else {
                        table_at(&mut root, &path).map_err(|msg| token.error(msg))?;
                    }
                    tracing::trace!(header = %path.join("."), array, "opened TOML table");

                    current = path;
                    self.end_of_statement()?;
                }
                Token::Bare(_) | Token::String(_) => {
                    let mut path = vec![key_name(token.value.clone())];
                    while self.peeked.value == Token::Dot {
                        self.bump()?;
                        path.push(self.key()?);
                    }
                    self.check_depth(current.len() + path.len(), &token)?;

                    let equals = self.bump()?;
                    if equals.value != Token::Equals {
                        return Err(equals.error(format!(
                            "expected `=` after key, found {}",
                            equals.value
                        )));
                    }

                    self.depth = current.len() + path.len();
                    let value = self.parse_value()?;
                    self.end_of_statement()?;

                    let table = table_at(&mut root, &current).map_err(|msg| token.error(msg))?;
                    insert_dotted(table, &path, value).map_err(|msg| token.error(msg))?;
                }
                ref other => {
                    return Err(token.error(format!(
                        "expected a key or a table header, found {}",
                        other
                    )));
                }
            }
        }
    }

    fn bump(&mut self) -> Result<Spanned<Token>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.peeked, next))
    }

    fn skip_newlines(&mut self) -> Result<()> {
        while self.peeked.value == Token::Newline {
            self.bump()?;
        }
        Ok(())
    }

    fn end_of_statement(&self) -> Result<()> {
        match &self.peeked.value {
            Token::Newline | Token::Eof => Ok(()),
            other => Err(self
                .peeked
                .error(format!("expected a newline after the statement, found {}", other))),
        }
    }

    fn check_depth(&self, depth: usize, at: &Spanned<Token>) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded {
                line: at.line,
                col: at.col,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn key(&mut self) -> Result<String> {
        let token = self.bump()?;
        match token.value {
            Token::Bare(_) | Token::String(_) => Ok(key_name(token.value)),
            ref other => Err(token.error(format!("expected a key, found {}", other))),
        }
    }

    fn key_path(&mut self) -> Result<Vec<String>> {
        let mut path = vec![self.key()?];
        while self.peeked.value == Token::Dot {
            self.bump()?;
            path.push(self.key()?);
        }
        Ok(path)
    }

    fn close_header(&mut self, array: bool) -> Result<()> {
        let closers = if array { 2 } else { 1 };
        for _ in 0..closers {
            let token = self.bump()?;
            if token.value != Token::RightBracket {
                return Err(token.error(format!(
                    "expected `]` to close the table header, found {}",
                    token.value
                )));
            }
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.bump()?;
        match token.value {
            Token::String(s) => Ok(Value::String(s)),
            Token::Integer(i) => Ok(Value::Integer(i)),
            Token::Float(f) => Ok(Value::Float(f)),
            Token::Boolean(b) => Ok(Value::Boolean(b)),
            Token::Timestamp(ts) => Ok(Value::Timestamp(ts)),
            Token::LeftBracket => self.parse_array(&token),
            Token::Bare(ref word) => Err(token.error(format!(
                "expected a value, found bare word `{}` (strings must be quoted)",
                word
            ))),
            ref other => Err(token.error(format!("expected a value, found {}", other))),
        }
    }

    fn parse_array(&mut self, open: &Spanned<Token>) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                line: open.line,
                col: open.col,
                limit: self.max_depth,
            });
        }
        self.depth += 1;

        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.peeked.value == Token::RightBracket {
                self.bump()?;
                break;
            }

            items.push(self.parse_value()?);

            self.skip_newlines()?;
            let separator = self.bump()?;
            match separator.value {
                Token::Comma => continue,
                Token::RightBracket => break,
                ref other => {
                    return Err(separator.error(format!(
                        "expected `,` or `]` in array, found {}",
                        other
                    )));
                }
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }
}

fn key_name(token: Token) -> String {
    match token {
        Token::Bare(s) | Token::String(s) => s,
        other => other.to_string(),
    }
}

/// Walks `path` from `root`, creating missing tables. An array of tables
/// resolves to its last element.
fn table_at<'t>(root: &'t mut Table, path: &[String]) -> std::result::Result<&'t mut Table, String> {
    let mut table = root;
    for (i, key) in path.iter().enumerate() {
        let slot = table
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        table = match slot {
            Value::Table(inner) => inner,
            Value::Array(items) => match items.last_mut() {
                Some(Value::Table(inner)) => inner,
                _ => return Err(not_a_table(&path[..=i])),
            },
            _ => return Err(not_a_table(&path[..=i])),
        };
    }
    Ok(table)
}

fn not_a_table(path: &[String]) -> String {
    format!(
        "cannot use `{}` as a table, it is already defined as a value",
        path.join(".")
    )
}

/// Appends a fresh table to the array of tables at `path`.
fn append_table(root: &mut Table, path: &[String]) -> std::result::Result<(), String> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| "empty table header".to_string())?;
    let parent = table_at(root, parents)?;
    match parent.entry(last.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(Value::Array(vec![Value::Table(Table::new())]));
            Ok(())
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) if matches!(items.last(), Some(Value::Table(_))) => {
                items.push(Value::Table(Table::new()));
                Ok(())
            }
            _ => Err(format!(
                "cannot append to `{}`, it is not an array of tables",
                path.join(".")
            )),
        },
    }
}

/// Inserts `value` under a dotted key, rejecting keys that already exist.
fn insert_dotted(table: &mut Table, path: &[String], value: Value) -> std::result::Result<(), String> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| "empty key".to_string())?;
    let parent = table_at(table, parents)?;
    match parent.entry(last.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
        Entry::Occupied(_) => Err(format!("duplicate key `{}`", path.join("."))),
    }
}
