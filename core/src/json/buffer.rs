use serde_json::Value;

use crate::Error;
use crate::traits::{Token, TokenReader, TokenWriter};

/// An in-memory token sequence with a read cursor.
///
/// `TokenBuffer` is both a [`TokenReader`] over its tokens and a
/// [`TokenWriter`] that appends to them, which makes it the natural
/// collaborator for tests and for piping a write straight into a read.
///
/// # Example
///
/// ```ignore
/// let mut buffer = TokenBuffer::new();
/// converter.write(&mut buffer, Some(&list))?;
///
/// let mut reader = TokenBuffer::from_tokens(buffer.into_tokens());
/// let copy: Option<SequenceList<u32>> = converter.read(&mut reader, None)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenBuffer {
    /// Create an empty buffer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer positioned on the first of `tokens`.
    #[inline]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Every token held, consumed or not.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens from the current position onwards.
    #[inline]
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.cursor..).unwrap_or(&[])
    }

    /// Index of the current token.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Push a single token.
    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenBuffer {
    fn from(tokens: Vec<Token>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl TokenReader for TokenBuffer {
    #[inline]
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Result<bool, Error> {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        Ok(self.cursor < self.tokens.len())
    }
}

impl TokenWriter for TokenBuffer {
    fn write_start_array(&mut self) -> Result<(), Error> {
        self.push(Token::StartArray);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), Error> {
        self.push(Token::EndArray);
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), Error> {
        self.push(Token::Null);
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        self.push(Token::from_value(value.clone()));
        Ok(())
    }
}
