//! Streaming read adapter.
//!
//! When a sequence type is built through a constructor, the constructor is
//! handed the remaining array elements as [`Elements`] (an iterator view) or
//! [`LazyElements`] (a stream view) without materializing them first. Both
//! views advance the token reader by exactly one token per step and decode
//! elements on demand.
//!
//! # Consumption
//!
//! A view may be iterated at most once, and the converter requires that the
//! constructor drives iteration through to the closing `]`. Progress is
//! recorded in a [`ConsumptionTracker`] owned by the converter:
//!
//! ```text
//! NotStarted ──begin──▶ InProgress ──`]`──▶ Completed
//!      │                    │                   │
//!      └────────────────────┴──second begin─────┴──▶ AlreadyConsumed
//! ```
//!
//! Consuming a view by value (`into_iter`, `into_stream`) makes a second
//! iteration impossible. The by-reference entry points
//! ([`Elements::iter`], [`LazyElements::stream`]) can be called again and
//! fail with [`Error::AlreadyConsumed`] when they are.

use core::marker::PhantomData;
use core::pin::Pin;
use core::sync::atomic::{AtomicU8, Ordering};
use core::task::{Context, Poll};

use futures_core::Stream;
use serde::de::DeserializeOwned;

use crate::Error;
use crate::codec;
use crate::config::ElementBudget;
use crate::traits::{Append, Token, TokenReader};

/// Consumption progress of one read adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConsumptionState {
    /// Iteration has not been started.
    NotStarted = 0,
    /// Iteration has been started but has not reached `]`.
    InProgress = 1,
    /// Iteration reached `]`.
    Completed = 2,
    /// A second iteration was attempted. Terminal.
    AlreadyConsumed = 3,
}

impl ConsumptionState {
    #[inline]
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ConsumptionState::NotStarted,
            1 => ConsumptionState::InProgress,
            2 => ConsumptionState::Completed,
            _ => ConsumptionState::AlreadyConsumed,
        }
    }
}

/// Records the [`ConsumptionState`] of a read adapter.
///
/// The tracker outlives the adapter so the converter can inspect it after
/// the constructor returns.
#[derive(Debug)]
pub struct ConsumptionTracker {
    state: AtomicU8,
}

impl Default for ConsumptionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionTracker {
    /// Creates a tracker in the [`ConsumptionState::NotStarted`] state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConsumptionState::NotStarted as u8),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> ConsumptionState {
        ConsumptionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns true once iteration reached `]`.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state() == ConsumptionState::Completed
    }

    /// Starts the one permitted iteration.
    ///
    /// Any later call moves the tracker to
    /// [`ConsumptionState::AlreadyConsumed`] and fails.
    pub fn begin(&self) -> Result<(), Error> {
        match self.state.compare_exchange(
            ConsumptionState::NotStarted as u8,
            ConsumptionState::InProgress as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(()),
            Err(_) => {
                self.state
                    .store(ConsumptionState::AlreadyConsumed as u8, Ordering::Release);
                Err(Error::AlreadyConsumed)
            }
        }
    }

    fn complete(&self) {
        let _ = self.state.compare_exchange(
            ConsumptionState::InProgress as u8,
            ConsumptionState::Completed as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// Advances the reader onto the next element and decodes it.
///
/// Returns `Ok(None)` when the reader lands on `]`, leaving it positioned
/// there.
pub(crate) fn read_next<E, R>(reader: &mut R, budget: &mut ElementBudget) -> Result<Option<E>, Error>
where
    E: DeserializeOwned,
    R: TokenReader + ?Sized,
{
    if !reader.advance()? {
        return Err(Error::UnexpectedEnd);
    }
    match reader.current() {
        None => Err(Error::UnexpectedEnd),
        Some(Token::EndArray) => Ok(None),
        Some(token) => {
            budget.consume()?;
            codec::decode(token).map(Some)
        }
    }
}

/// Eagerly reads every remaining element into `target`.
pub(crate) fn populate<E, A, R>(
    target: &mut A,
    reader: &mut R,
    budget: &mut ElementBudget,
) -> Result<(), Error>
where
    E: DeserializeOwned,
    A: Append<E> + ?Sized,
    R: TokenReader + ?Sized,
{
    while let Some(element) = read_next::<E, R>(reader, budget)? {
        target.append(element);
        tracing::trace!(count = budget.count(), "appended element");
    }
    Ok(())
}

/// Element-type-agnostic state shared by both adapter views.
pub struct ElementCursor<'a> {
    reader: &'a mut dyn TokenReader,
    tracker: &'a ConsumptionTracker,
    budget: ElementBudget,
    failed: bool,
}

impl<'a> ElementCursor<'a> {
    /// Creates a cursor over a reader positioned on `[`.
    pub fn new(
        reader: &'a mut dyn TokenReader,
        tracker: &'a ConsumptionTracker,
        budget: ElementBudget,
    ) -> Self {
        Self {
            reader,
            tracker,
            budget,
            failed: false,
        }
    }

    fn next_element<E: DeserializeOwned>(&mut self) -> Option<Result<E, Error>> {
        if self.failed || self.tracker.state() != ConsumptionState::InProgress {
            return None;
        }
        match read_next::<E, _>(&mut *self.reader, &mut self.budget) {
            Ok(Some(element)) => {
                tracing::trace!(count = self.budget.count(), "produced element");
                Some(Ok(element))
            }
            Ok(None) => {
                self.tracker.complete();
                None
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Iterator view over the remaining elements of an array.
///
/// Handed to [`FromElements`](crate::traits::FromElements) constructors.
pub struct Elements<'a, E> {
    cursor: ElementCursor<'a>,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E> Elements<'a, E> {
    /// Wraps a cursor.
    pub fn new(cursor: ElementCursor<'a>) -> Self {
        Self {
            cursor,
            _marker: PhantomData,
        }
    }

    /// Starts iterating by reference.
    ///
    /// Fails with [`Error::AlreadyConsumed`] if iteration was started before.
    pub fn iter(&mut self) -> Result<Iter<'_, 'a, E>, Error> {
        self.cursor.tracker.begin()?;
        Ok(Iter { elements: self })
    }
}

impl<'a, E: DeserializeOwned> IntoIterator for Elements<'a, E> {
    type Item = Result<E, Error>;
    type IntoIter = IntoIter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        let pending = self.cursor.tracker.begin().err();
        IntoIter {
            elements: self,
            pending,
        }
    }
}

/// Borrowing iterator returned by [`Elements::iter`].
pub struct Iter<'s, 'a, E> {
    elements: &'s mut Elements<'a, E>,
}

impl<E: DeserializeOwned> Iterator for Iter<'_, '_, E> {
    type Item = Result<E, Error>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.elements.cursor.next_element()
    }
}

/// Owning iterator returned by [`Elements::into_iter`].
pub struct IntoIter<'a, E> {
    elements: Elements<'a, E>,
    pending: Option<Error>,
}

impl<E: DeserializeOwned> Iterator for IntoIter<'_, E> {
    type Item = Result<E, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        self.elements.cursor.next_element()
    }
}

/// Stream view over the remaining elements of an array.
///
/// Handed to [`FromLazyElements`](crate::traits::FromLazyElements)
/// constructors.
pub struct LazyElements<'a, E> {
    cursor: ElementCursor<'a>,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E> LazyElements<'a, E> {
    /// Wraps a cursor.
    pub fn new(cursor: ElementCursor<'a>) -> Self {
        Self {
            cursor,
            _marker: PhantomData,
        }
    }

    /// Starts streaming by reference.
    ///
    /// Fails with [`Error::AlreadyConsumed`] if streaming was started before.
    pub fn stream(&mut self) -> Result<ElementStream<'_, 'a, E>, Error> {
        self.cursor.tracker.begin()?;
        Ok(ElementStream { elements: self })
    }

    /// Consumes the view and streams its elements.
    pub fn into_stream(self) -> IntoElementStream<'a, E> {
        let pending = self.cursor.tracker.begin().err();
        IntoElementStream {
            elements: self,
            pending,
        }
    }
}

/// Borrowing stream returned by [`LazyElements::stream`].
pub struct ElementStream<'s, 'a, E> {
    elements: &'s mut LazyElements<'a, E>,
}

impl<E: DeserializeOwned> Stream for ElementStream<'_, '_, E> {
    type Item = Result<E, Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().elements.cursor.next_element())
    }
}

/// Owning stream returned by [`LazyElements::into_stream`].
pub struct IntoElementStream<'a, E> {
    elements: LazyElements<'a, E>,
    pending: Option<Error>,
}

impl<E: DeserializeOwned> Stream for IntoElementStream<'_, E> {
    type Item = Result<E, Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(err) = this.pending.take() {
            return Poll::Ready(Some(Err(err)));
        }
        Poll::Ready(this.elements.cursor.next_element())
    }
}
