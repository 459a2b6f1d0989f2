//! Core error types for seqjson.
//!
//! Every fault raised while converting a sequence is reported as an
//! [`Error`]. Variants are distinguishable by kind so that a host serializer
//! can map them onto its own error model.

use crate::traits::TokenKind;

/// Boxed error used at the seams where user code or collaborators fail.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core seqjson error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested type accepts neither appended elements nor a sequence
    /// constructor.
    #[error(
        "cannot deserialize `{type_name}`: it does not accept appended elements and has no constructor taking a sequence of elements"
    )]
    TypeNotSupported {
        /// Name of the requested type.
        type_name: &'static str,
    },

    /// A value was written whose type has no sequence capability.
    #[error("cannot serialize `{type_name}`: it is not a registered sequence type")]
    NotASequence {
        /// Name of the written type.
        type_name: &'static str,
    },

    /// A sequence was expected but the current token is neither the start of
    /// an array nor `null`.
    #[error("expected start of JSON array, found {found}")]
    MalformedToken {
        /// Kind of the offending token.
        found: TokenKind,
    },

    /// An existing instance was supplied for a type that can only be built
    /// through a constructor.
    #[error(
        "cannot deserialize into an existing `{type_name}`: the type can only be built through its constructor"
    )]
    AmbiguousExistingInstance {
        /// Name of the requested type.
        type_name: &'static str,
    },

    /// An existing instance was supplied whose value does not accept appended
    /// elements.
    #[error("cannot deserialize into an existing `{type_name}`: the value does not accept appended elements")]
    NotAppendable {
        /// Name of the requested type.
        type_name: &'static str,
    },

    /// A constructor returned without reading through to the end of the
    /// sequence it was passed.
    #[error("constructor for `{type_name}` did not read through to the end of the sequence it was passed")]
    IncompleteConsumption {
        /// Name of the constructed type.
        type_name: &'static str,
    },

    /// A constructor tried to iterate the sequence it was passed more than
    /// once.
    #[error("constructor for `{type_name}` tried to iterate the sequence it was passed more than once")]
    DoubleConsumption {
        /// Name of the constructed type.
        type_name: &'static str,
    },

    /// Raw adapter fault raised when iteration is started a second time.
    ///
    /// The converter never returns this variant; it reports
    /// [`Error::DoubleConsumption`] naming the offending type instead.
    #[error("sequence elements were already consumed")]
    AlreadyConsumed,

    /// The token stream ended before the closing token of the array.
    #[error("unexpected end of token stream inside array")]
    UnexpectedEnd,

    /// More elements were read than the configured limit allows.
    #[error("element limit exceeded: read {count} > limit {limit}")]
    ElementLimitExceeded {
        /// Number of elements read when the limit was exceeded.
        count: usize,
        /// Maximum allowed element count.
        limit: usize,
    },

    /// The element codec failed to encode or decode a value.
    #[error("element codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The token reader or writer failed.
    #[error("token stream error: {0}")]
    Token(#[source] BoxError),

    /// The sequence being written failed while producing an element.
    #[error("sequence source failed: {0}")]
    Source(#[source] BoxError),

    /// A user constructor failed for a reason unrelated to consumption.
    #[error("constructor for `{type_name}` failed: {source}")]
    Constructor {
        /// Name of the constructed type.
        type_name: &'static str,
        /// Error returned by the constructor.
        #[source]
        source: BoxError,
    },

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if this error, or the error it directly wraps, is the raw
    /// [`Error::AlreadyConsumed`] adapter fault.
    pub fn is_already_consumed(&self) -> bool {
        wraps_already_consumed(self)
    }
}

/// Recognizes an [`Error::AlreadyConsumed`] fault at the top of a boxed error
/// or wrapped exactly one level below it.
pub(crate) fn wraps_already_consumed(err: &(dyn std::error::Error + 'static)) -> bool {
    let is_fault = |e: &(dyn std::error::Error + 'static)| {
        e.downcast_ref::<Error>()
            .is_some_and(|e| matches!(e, Error::AlreadyConsumed))
    };
    is_fault(err) || err.source().is_some_and(is_fault)
}
