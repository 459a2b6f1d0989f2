use core::fmt;

use serde_json::Value;

use crate::Error;

/// A single token of the JSON shape seqjson reads and writes.
///
/// Only the outermost array is tokenized; every element is carried as one
/// [`Token::Value`] (or [`Token::Null`]) regardless of its own structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// `null`
    Null,
    /// Any other JSON value.
    Value(Value),
}

impl Token {
    /// Returns the kind of this token.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::StartArray => TokenKind::StartArray,
            Token::EndArray => TokenKind::EndArray,
            Token::Null => TokenKind::Null,
            Token::Value(_) => TokenKind::Value,
        }
    }

    /// Wraps a JSON value, mapping `null` onto [`Token::Null`].
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Token::Null,
            other => Token::Value(other),
        }
    }
}

/// Discriminant of a [`Token`], used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartArray,
    EndArray,
    Null,
    Value,
    /// No token: the reader is past the end of its input.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::StartArray => write!(f, "`[`"),
            TokenKind::EndArray => write!(f, "`]`"),
            TokenKind::Null => write!(f, "`null`"),
            TokenKind::Value => write!(f, "value"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A positioned stream of tokens.
///
/// The reader is always positioned *on* a token: [`current`](Self::current)
/// returns it without moving, [`advance`](Self::advance) moves to the next
/// one. Converters leave the reader positioned on the closing `]` after
/// reading an array.
pub trait TokenReader: Send {
    /// The token the reader is positioned on, or `None` past the end of input.
    fn current(&self) -> Option<&Token>;

    /// Moves to the next token.
    ///
    /// Returns `Ok(false)` once the end of input has been reached.
    fn advance(&mut self) -> Result<bool, Error>;

    /// Kind of the current token.
    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.current()
            .map(Token::kind)
            .unwrap_or(TokenKind::EndOfInput)
    }
}

/// A sink for tokens.
pub trait TokenWriter: Send {
    /// Writes `[`.
    fn write_start_array(&mut self) -> Result<(), Error>;

    /// Writes `]`.
    fn write_end_array(&mut self) -> Result<(), Error>;

    /// Writes `null`.
    fn write_null(&mut self) -> Result<(), Error>;

    /// Writes a single JSON value.
    fn write_value(&mut self, value: &Value) -> Result<(), Error>;

    /// Writes a token.
    fn write_token(&mut self, token: &Token) -> Result<(), Error> {
        match token {
            Token::StartArray => self.write_start_array(),
            Token::EndArray => self.write_end_array(),
            Token::Null => self.write_null(),
            Token::Value(value) => self.write_value(value),
        }
    }
}

impl<R: TokenReader + ?Sized> TokenReader for &mut R {
    #[inline]
    fn current(&self) -> Option<&Token> {
        (**self).current()
    }

    #[inline]
    fn advance(&mut self) -> Result<bool, Error> {
        (**self).advance()
    }
}

impl<W: TokenWriter + ?Sized> TokenWriter for &mut W {
    fn write_start_array(&mut self) -> Result<(), Error> {
        (**self).write_start_array()
    }

    fn write_end_array(&mut self) -> Result<(), Error> {
        (**self).write_end_array()
    }

    fn write_null(&mut self) -> Result<(), Error> {
        (**self).write_null()
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        (**self).write_value(value)
    }
}
