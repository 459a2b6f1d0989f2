use core::ops::Range;

use logos::Logos;
use serde_json::Value;

use crate::Error;
use crate::traits::{Token, TokenReader};

/// Lexemes of JSON text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("null")]
    Null,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?")]
    Number,
}

impl Lexeme {
    fn describe(self) -> &'static str {
        match self {
            Lexeme::LBracket => "`[`",
            Lexeme::RBracket => "`]`",
            Lexeme::LBrace => "`{`",
            Lexeme::RBrace => "`}`",
            Lexeme::Comma => "`,`",
            Lexeme::Colon => "`:`",
            Lexeme::Null => "`null`",
            Lexeme::True => "`true`",
            Lexeme::False => "`false`",
            Lexeme::String => "string",
            Lexeme::Number => "number",
        }
    }
}

/// Malformed JSON text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid JSON at byte {offset}: {message}")]
pub struct JsonSyntaxError {
    /// Byte offset of the offending input.
    pub offset: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first token.
    Start,
    /// Inside the outermost array.
    Open { first: bool },
    /// Past the outermost value.
    Done,
}

/// A [`TokenReader`] over JSON text.
///
/// The outermost array is flattened into `[`, one token per element, and
/// `]`. Nested arrays and objects are carried whole as a single
/// [`Token::Value`]. A top-level scalar becomes a single token, so the
/// converter can report it as malformed.
///
/// # Example
///
/// ```ignore
/// let mut reader = JsonTokenReader::new(r#"["a", {"b": 1}, null]"#)?;
/// assert_eq!(reader.current(), Some(&Token::StartArray));
/// ```
pub struct JsonTokenReader<'s> {
    source: &'s str,
    lexer: logos::Lexer<'s, Lexeme>,
    state: State,
    current: Option<Token>,
}

impl<'s> JsonTokenReader<'s> {
    /// Creates a reader positioned on the first token of `source`.
    pub fn new(source: &'s str) -> Result<Self, Error> {
        let mut reader = Self {
            source,
            lexer: Lexeme::lexer(source),
            state: State::Start,
            current: None,
        };
        reader.advance()?;
        Ok(reader)
    }

    /// Byte offset just past the current token.
    #[inline]
    pub fn offset(&self) -> usize {
        self.lexer.span().end
    }

    fn syntax(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::Token(Box::new(JsonSyntaxError {
            offset,
            message: message.into(),
        }))
    }

    fn lex(&mut self) -> Result<Option<(Lexeme, Range<usize>)>, Error> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(lexeme)) => Ok(Some((lexeme, self.lexer.span()))),
            Some(Err(())) => Err(self.syntax(self.lexer.span().start, "unrecognized input")),
        }
    }

    fn lex_required(&mut self) -> Result<(Lexeme, Range<usize>), Error> {
        match self.lex()? {
            Some(next) => Ok(next),
            None => Err(self.syntax(self.source.len(), "unterminated array")),
        }
    }

    fn parse_slice(&self, span: Range<usize>) -> Result<Value, Error> {
        let text = self.source.get(span.clone()).unwrap_or_default();
        serde_json::from_str(text).map_err(|err| self.syntax(span.start, err.to_string()))
    }

    /// Reads one complete value starting at `lexeme`.
    fn value(&mut self, lexeme: Lexeme, span: Range<usize>) -> Result<Value, Error> {
        match lexeme {
            Lexeme::Null => Ok(Value::Null),
            Lexeme::True => Ok(Value::Bool(true)),
            Lexeme::False => Ok(Value::Bool(false)),
            Lexeme::String | Lexeme::Number => self.parse_slice(span),
            Lexeme::LBracket | Lexeme::LBrace => {
                let start = span.start;
                let mut depth = 1usize;
                let mut end = span.end;
                while depth > 0 {
                    let (next, next_span) = match self.lex()? {
                        Some(next) => next,
                        None => return Err(self.syntax(start, "unterminated nested value")),
                    };
                    match next {
                        Lexeme::LBracket | Lexeme::LBrace => depth += 1,
                        Lexeme::RBracket | Lexeme::RBrace => depth -= 1,
                        _ => {}
                    }
                    end = next_span.end;
                }
                self.parse_slice(start..end)
            }
            other => Err(self.syntax(span.start, format!("unexpected {}", other.describe()))),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        match self.state {
            State::Start => match self.lex()? {
                None => {
                    self.state = State::Done;
                    Ok(None)
                }
                Some((Lexeme::LBracket, _)) => {
                    self.state = State::Open { first: true };
                    Ok(Some(Token::StartArray))
                }
                Some((lexeme, span)) => {
                    self.state = State::Done;
                    Ok(Some(Token::from_value(self.value(lexeme, span)?)))
                }
            },
            State::Open { first } => {
                let (mut lexeme, mut span) = self.lex_required()?;
                if lexeme == Lexeme::RBracket {
                    self.state = State::Done;
                    return Ok(Some(Token::EndArray));
                }
                if !first {
                    if lexeme != Lexeme::Comma {
                        return Err(self.syntax(
                            span.start,
                            format!("expected `,` or `]`, found {}", lexeme.describe()),
                        ));
                    }
                    (lexeme, span) = self.lex_required()?;
                    if lexeme == Lexeme::RBracket {
                        return Err(self.syntax(span.start, "trailing comma"));
                    }
                }
                self.state = State::Open { first: false };
                Ok(Some(Token::from_value(self.value(lexeme, span)?)))
            }
            State::Done => match self.lex()? {
                None => Ok(None),
                Some((_, span)) => Err(self.syntax(span.start, "trailing characters")),
            },
        }
    }
}

impl TokenReader for JsonTokenReader<'_> {
    #[inline]
    fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Result<bool, Error> {
        self.current = self.next_token()?;
        Ok(self.current.is_some())
    }
}
