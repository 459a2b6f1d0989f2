//! The default container.

use futures::stream::{self, BoxStream, StreamExt};

use crate::BoxError;
use crate::traits::{Append, AsyncSequence};

/// The built-in mutable sequence of `E`.
///
/// `SequenceList` is the default container for an element type: the
/// converter instantiates it when the requested type is the sequence
/// capability itself, or any type a `SequenceList` converts into.
///
/// # Example
///
/// ```ignore
/// let list: SequenceList<&str> = ["a", "b"].into_iter().collect();
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceList<E> {
    items: Vec<E>,
}

impl<E> SequenceList<E> {
    /// Create an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a list with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, element: E) {
        self.items.push(element);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.items.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    #[inline]
    pub fn into_vec(self) -> Vec<E> {
        self.items
    }
}

impl<E> Default for SequenceList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> From<Vec<E>> for SequenceList<E> {
    fn from(items: Vec<E>) -> Self {
        Self { items }
    }
}

impl<E> FromIterator<E> for SequenceList<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for SequenceList<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<E> IntoIterator for SequenceList<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a SequenceList<E> {
    type Item = &'a E;
    type IntoIter = core::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E: Clone + Send + Sync> AsyncSequence for SequenceList<E> {
    type Item = E;

    fn elements(&self) -> BoxStream<'_, Result<E, BoxError>> {
        stream::iter(self.items.iter().cloned().map(Ok)).boxed()
    }

    fn as_sink(&mut self) -> Option<&mut dyn Append<E>> {
        Some(self)
    }
}

impl<E: Clone + Send + Sync + 'static> From<SequenceList<E>> for Box<dyn AsyncSequence<Item = E>> {
    fn from(list: SequenceList<E>) -> Self {
        Box::new(list)
    }
}
