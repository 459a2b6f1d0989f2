//! Per-element value codec.
//!
//! Elements are converted to and from [`Token`]s through serde, using
//! `serde_json::Value` as the intermediate representation.

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;

use crate::Error;
use crate::traits::Token;

/// Decodes one element from the token the reader is positioned on.
///
/// Only element tokens ([`Token::Null`] and [`Token::Value`]) decode; array
/// delimiters fail with [`Error::MalformedToken`].
pub fn decode<E: DeserializeOwned>(token: &Token) -> Result<E, Error> {
    match token {
        Token::Null => Ok(E::deserialize(&Value::Null)?),
        Token::Value(value) => Ok(E::deserialize(value)?),
        other => Err(Error::MalformedToken {
            found: other.kind(),
        }),
    }
}

/// Encodes one element into the token that represents it.
pub fn encode<E: Serialize + ?Sized>(element: &E) -> Result<Token, Error> {
    Ok(Token::from_value(serde_json::to_value(element)?))
}
