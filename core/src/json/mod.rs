//! Concrete token collaborators.
//!
//! - [`TokenBuffer`]: in-memory tokens, readable and writable
//! - [`JsonTokenReader`]: reads JSON text through a `logos` lexer
//! - [`JsonWriter`]: renders compact JSON text

mod buffer;
mod reader;
mod writer;

pub use buffer::TokenBuffer;
pub use reader::{JsonSyntaxError, JsonTokenReader};
pub use writer::JsonWriter;
