use super::lexer::{Lexer, Token};
use crate::read::Spanned;
use crate::{CodecOptions, Error, Result, Table, Value};

/// Recursive-descent JSON parser with one token of lookahead.
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

    /// Parses a complete document: one value followed by end of input.
    pub fn parse(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        match &self.peeked.value {
            Token::Eof => Ok(value),
            other => Err(self
                .peeked
                .error(format!("unexpected {} after the root value", other))),
        }
    }

    fn bump(&mut self) -> Result<Spanned<Token>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.peeked, next))
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.bump()?;
        match token.value {
            Token::LeftBrace => self.nested(&token, Self::parse_object),
            Token::LeftBracket => self.nested(&token, Self::parse_array),
            Token::String(s) => Ok(Value::String(s)),
            Token::Number(ref lexeme) => number(lexeme, &token),
            Token::True => Ok(Value::Boolean(true)),
            Token::False => Ok(Value::Boolean(false)),
            Token::Null => Ok(Value::Null),
            ref other => Err(token.error(format!("expected a value, found {}", other))),
        }
    }

    fn nested(
        &mut self,
        open: &Spanned<Token>,
        parse: fn(&mut Self) -> Result<Value>,
    ) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                line: open.line,
                col: open.col,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<Value> {
        let mut table = Table::new();
        if self.peeked.value == Token::RightBrace {
            self.bump()?;
            return Ok(Value::Table(table));
        }

        loop {
            let key = self.bump()?;
            let key = match key.value {
                Token::String(s) => s,
                ref other => {
                    return Err(key.error(format!("expected string key, found {}", other)));
                }
            };

            let colon = self.bump()?;
            if colon.value != Token::Colon {
                return Err(colon.error(format!(
                    "expected `:` after object key, found {}",
                    colon.value
                )));
            }

            let value = self.parse_value()?;
            // A repeated key keeps its first position and its last value.
            table.insert(key, value);

            let separator = self.bump()?;
            match separator.value {
                Token::Comma => continue,
                Token::RightBrace => return Ok(Value::Table(table)),
                ref other => {
                    return Err(separator.error(format!("expected `,` or `}}`, found {}", other)));
                }
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        let mut array = Vec::new();
        if self.peeked.value == Token::RightBracket {
            self.bump()?;
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);

            let separator = self.bump()?;
            match separator.value {
                Token::Comma => continue,
                Token::RightBracket => return Ok(Value::Array(array)),
                ref other => {
                    return Err(separator.error(format!("expected `,` or `]`, found {}", other)));
                }
            }
        }
    }
}

/// A lexeme with a fraction or exponent is a float, anything else an integer.
fn number(lexeme: &str, token: &Spanned<Token>) -> Result<Value> {
    if lexeme.contains(['.', 'e', 'E']) {
        match lexeme.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(token.error(format!("number `{}` is out of range", lexeme))),
        }
    } else {
        lexeme
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| token.error(format!("integer `{}` is out of range", lexeme)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input, CodecOptions::default())?.parse()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("42").unwrap(), Value::Integer(42));
        assert_eq!(parse("-7").unwrap(), Value::Integer(-7));
        assert_eq!(parse("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(parse("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse("\"hi\"").unwrap(), Value::from("hi"));
        assert_eq!(parse("true").unwrap(), Value::Boolean(true));
        assert_eq!(parse(" null ").unwrap(), Value::Null);
    }

    #[test]
    fn test_nested_document() {
        let parsed = parse(r#"{"name": "Alice", "tags": ["a", 1, null], "meta": {}}"#).unwrap();
        assert_eq!(
            parsed,
            value!({
                "name": "Alice",
                "tags": ["a", 1, null],
                "meta": {}
            })
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(parse("{ }").unwrap(), Value::Table(Table::new()));
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let parsed = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let keys: Vec<_> = parsed.as_table().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(parsed.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_integer_overflow_is_syntax_error() {
        assert!(matches!(
            parse("9223372036854775808"),
            Err(Error::Syntax { .. })
        ));
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Value::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "{invalid json}",
            "[1, 2",
            "[1 2]",
            "[1,]",
            r#"{"a" 1}"#,
            r#"{"a": 1,}"#,
            r#"{1: 2}"#,
            "",
            "1 2",
            "]",
        ] {
            assert!(
                matches!(parse(input), Err(Error::Syntax { .. })),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_error_position() {
        match parse("{\n  \"a\": ?\n}") {
            Err(Error::Syntax { line, col, .. }) => assert_eq!((line, col), (2, 8)),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let options = CodecOptions::new().with_max_depth(3);
        assert!(Parser::new("[[[1]]]", options).unwrap().parse().is_ok());

        let err = Parser::new("[[[[1]]]]", options).unwrap().parse().unwrap_err();
        assert_eq!(
            err,
            Error::DepthLimitExceeded {
                line: 1,
                col: 4,
                limit: 3
            }
        );
    }

    #[test]
    fn test_deep_input_does_not_overflow() {
        let input = "[".repeat(100_000);
        assert!(matches!(
            parse(&input),
            Err(Error::DepthLimitExceeded { limit: 128, .. })
        ));
    }
}
