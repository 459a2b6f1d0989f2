use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::BoxError;
use crate::adapter::{Elements, LazyElements};

/// Bounds every element type carried by a sequence must satisfy.
///
/// Elements are encoded and decoded through serde, and the default container
/// hands out clones of its elements when it is written.
pub trait Element: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<E> Element for E where E: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// A lazily produced sequence of elements.
///
/// This is the capability seqjson converts to and from a JSON array.
/// [`elements`](Self::elements) may be called any number of times; each
/// call starts a fresh production of the sequence, which may suspend between
/// elements.
pub trait AsyncSequence: Send + Sync {
    /// The element type produced by the sequence.
    type Item;

    /// Starts producing the elements of this sequence, in order.
    fn elements(&self) -> BoxStream<'_, Result<Self::Item, BoxError>>;

    /// Returns an append-capable view of this sequence, if the underlying
    /// value accepts appended elements.
    ///
    /// Reading into an existing [`DynSequence`] appends through this view,
    /// so container types should return `Some(self)` here.
    fn as_sink(&mut self) -> Option<&mut dyn Append<Self::Item>> {
        None
    }
}

/// The lazy-sequence capability itself, as a value type.
pub type DynSequence<E> = Box<dyn AsyncSequence<Item = E>>;

impl<S: AsyncSequence + ?Sized> AsyncSequence for Box<S> {
    type Item = S::Item;

    #[inline]
    fn elements(&self) -> BoxStream<'_, Result<Self::Item, BoxError>> {
        (**self).elements()
    }

    #[inline]
    fn as_sink(&mut self) -> Option<&mut dyn Append<Self::Item>> {
        (**self).as_sink()
    }
}

/// A container that accepts elements appended one at a time.
///
/// Implemented for every [`Extend`] type.
pub trait Append<E> {
    /// Appends one element.
    fn append(&mut self, element: E);
}

impl<E, T: Extend<E>> Append<E> for T {
    #[inline]
    fn append(&mut self, element: E) {
        self.extend(core::iter::once(element));
    }
}

/// A type with a constructor taking an eagerly traversable sequence.
///
/// The constructor must iterate `elements` exactly once and through to its
/// end. Stopping early fails the read with
/// [`Error::IncompleteConsumption`](crate::Error::IncompleteConsumption);
/// starting a second iteration fails it with
/// [`Error::DoubleConsumption`](crate::Error::DoubleConsumption).
///
/// # Example
///
/// ```ignore
/// struct Words(Vec<String>);
///
/// impl FromElements<String> for Words {
///     fn from_elements(elements: Elements<'_, String>) -> Result<Self, BoxError> {
///         Ok(Words(elements.into_iter().collect::<Result<_, _>>()?))
///     }
/// }
/// ```
pub trait FromElements<E>: Sized {
    /// Builds a value from the elements of the array being read.
    fn from_elements(elements: Elements<'_, E>) -> Result<Self, BoxError>;
}

/// A type with a constructor taking a lazily produced sequence.
///
/// The same consumption rules as [`FromElements`] apply.
///
/// # Example
///
/// ```ignore
/// impl FromLazyElements<String> for Words {
///     fn from_lazy_elements<'a>(
///         elements: LazyElements<'a, String>,
///     ) -> BoxFuture<'a, Result<Self, BoxError>> {
///         Box::pin(async move {
///             let words = elements.into_stream().try_collect().await?;
///             Ok(Words(words))
///         })
///     }
/// }
/// ```
pub trait FromLazyElements<E>: Sized {
    /// Builds a value from the elements of the array being read.
    fn from_lazy_elements<'a>(elements: LazyElements<'a, E>) -> BoxFuture<'a, Result<Self, BoxError>>;
}
