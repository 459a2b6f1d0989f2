//! Core traits for seqjson.
//!
//! This module defines the seams between seqjson and the code around it:
//! the token collaborators a host serializer supplies, and the capabilities
//! a sequence type exposes.
//!
//! # Trait Hierarchy
//!
//! ```text
//! TokenReader (positioned token input)
//!     └── current() / advance()
//!
//! TokenWriter (token output)
//!     └── write_start_array() / write_value() / write_end_array() / write_null()
//!
//! AsyncSequence (lazy element production, the converted capability)
//!     └── as_sink() -> Append (optional mutation)
//!
//! FromElements / FromLazyElements (sequence constructors)
//! ```
//!
//! # Usage Patterns
//!
//! ## Writing
//!
//! ```ignore
//! use seqjson::{AsyncSequence, BoxError};
//! use futures::stream::{self, BoxStream, StreamExt};
//!
//! struct Countdown(u32);
//!
//! impl AsyncSequence for Countdown {
//!     type Item = u32;
//!
//!     fn elements(&self) -> BoxStream<'_, Result<u32, BoxError>> {
//!         stream::iter((0..self.0).rev().map(Ok)).boxed()
//!     }
//! }
//! ```
//!
//! ## Reading through a constructor
//!
//! ```ignore
//! use seqjson::{BoxError, Elements, FromElements};
//!
//! impl FromElements<u32> for Countdown {
//!     fn from_elements(elements: Elements<'_, u32>) -> Result<Self, BoxError> {
//!         let values: Vec<u32> = elements.into_iter().collect::<Result<_, _>>()?;
//!         Ok(Countdown(values.len() as u32))
//!     }
//! }
//! ```

mod sequence;
mod token;

pub use sequence::{
    Append, AsyncSequence, DynSequence, Element, FromElements, FromLazyElements,
};
pub use token::{Token, TokenKind, TokenReader, TokenWriter};
