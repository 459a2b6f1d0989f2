#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
//! Streaming conversion between lazily produced sequences and JSON arrays.
//!
//! This crate re-exports [`seqjson_core`]; see [`SequenceConverter`] for the
//! entry points and [`TypeRegistry`] for describing your types.
pub use seqjson_core::*;
