//! Streaming conversion between lazily produced sequences and JSON arrays.
//!
//! A [`SequenceConverter`] writes any registered [`AsyncSequence`] as a JSON
//! array without materializing it, and reads an array back into a target
//! type by one of four construction strategies:
//!
//! - populate an existing or blank container by appending elements
//! - hand the elements to a constructor taking an eagerly traversable
//!   sequence ([`FromElements`])
//! - hand the elements to a constructor taking a lazily produced sequence
//!   ([`FromLazyElements`])
//! - refuse the type
//!
//! Constructors receive the elements un-materialized and must read them
//! exactly once, through to the end.

pub mod adapter;
pub mod codec;
pub mod config;
mod converter;
mod error;
pub mod json;
mod list;
pub mod registry;
pub mod strategy;
pub mod traits;
mod write;

pub use adapter::{ConsumptionState, ConsumptionTracker, ElementCursor, Elements, LazyElements};
pub use config::{ConverterConfig, ElementBudget};
pub use converter::SequenceConverter;
pub use error::{BoxError, Error};
pub use json::{JsonTokenReader, JsonWriter, TokenBuffer};
pub use list::SequenceList;
pub use registry::{
    CapabilityResolver, Registrar, SequenceCapability, TypeKey, TypeKind, TypeRegistration,
    TypeRegistry,
};
pub use strategy::{ConstructionStrategy, StrategyCache};
pub use traits::{
    Append, AsyncSequence, DynSequence, Element, FromElements, FromLazyElements, Token, TokenKind,
    TokenReader, TokenWriter,
};
pub use write::{write_elements, write_sequence};
