//! Sequence types shared by the integration tests.
//!
//! Each type exercises one way of obtaining an instance: appending to a
//! blank container, a constructor taking an eagerly traversable sequence,
//! or a constructor taking a lazily produced sequence. The `Abstract*`
//! types carry the same operations but are registered as abstract.
#![allow(dead_code)]

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use seqjson::{
    Append, AsyncSequence, BoxError, DynSequence, Elements, FromElements, FromLazyElements,
    LazyElements, SequenceConverter, SequenceList, TypeKind, TypeRegistry,
};

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor",
];

/// `count` words.
pub fn words(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| WORDS[i % WORDS.len()].to_string())
        .collect()
}

/// The JSON array holding `values`.
pub fn json_of(values: &[String]) -> String {
    serde_json::to_string(values).unwrap()
}

/// Drains a sequence on the current thread.
pub fn collect<S: AsyncSequence + ?Sized>(sequence: &S) -> Vec<S::Item> {
    futures::executor::block_on(sequence.elements().try_collect()).unwrap()
}

fn stream_of(data: &[String]) -> BoxStream<'_, Result<String, BoxError>> {
    stream::iter(data.iter().cloned().map(Ok)).boxed()
}

/// Completes on its second poll.
#[derive(Debug, Default)]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Implements [`AsyncSequence`] over a `data: Vec<String>` field.
macro_rules! word_sequence {
    ($($ty:ident),* $(,)?) => {$(
        impl AsyncSequence for $ty {
            type Item = String;

            fn elements(&self) -> BoxStream<'_, Result<String, BoxError>> {
                stream_of(&self.data)
            }
        }
    )*};
}

/// Like `word_sequence!`, also exposing the value as an append sink.
macro_rules! appendable_word_sequence {
    ($($ty:ident),* $(,)?) => {$(
        impl AsyncSequence for $ty {
            type Item = String;

            fn elements(&self) -> BoxStream<'_, Result<String, BoxError>> {
                stream_of(&self.data)
            }

            fn as_sink(&mut self) -> Option<&mut dyn Append<String>> {
                Some(self)
            }
        }
    )*};
}

/// Implements [`FromElements`] by collecting every element.
macro_rules! collect_elements {
    ($($ty:ident),* $(,)?) => {$(
        impl FromElements<String> for $ty {
            fn from_elements(elements: Elements<'_, String>) -> Result<Self, BoxError> {
                let data = elements.into_iter().collect::<Result<Vec<_>, _>>()?;
                Ok(Self { data })
            }
        }
    )*};
}

/// Implements [`FromLazyElements`] by streaming every element.
macro_rules! stream_elements {
    ($($ty:ident),* $(,)?) => {$(
        impl FromLazyElements<String> for $ty {
            fn from_lazy_elements<'a>(
                elements: LazyElements<'a, String>,
            ) -> BoxFuture<'a, Result<Self, BoxError>> {
                Box::pin(async move {
                    let data = elements.into_stream().try_collect::<Vec<_>>().await?;
                    Ok(Self { data })
                })
            }
        }
    )*};
}

// -----------------------------------------------------------------------------
// Appendable containers

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Collection {
    pub data: Vec<String>,
}

impl Extend<String> for Collection {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionWithoutDefault {
    pub data: Vec<String>,
}

impl Extend<String> for CollectionWithoutDefault {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AbstractCollection {
    pub data: Vec<String>,
}

impl Extend<String> for AbstractCollection {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

// -----------------------------------------------------------------------------
// Eager constructors

#[derive(Debug)]
pub struct ConstructWithElements {
    pub data: Vec<String>,
}

#[derive(Debug)]
pub struct AbstractConstructWithElements {
    pub data: Vec<String>,
}

/// Reads only the first element.
#[derive(Debug)]
pub struct ConstructWithElementsIncomplete {
    pub data: Vec<String>,
}

impl FromElements<String> for ConstructWithElementsIncomplete {
    fn from_elements(elements: Elements<'_, String>) -> Result<Self, BoxError> {
        let data = elements.into_iter().take(1).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { data })
    }
}

/// Never looks at its elements.
#[derive(Debug)]
pub struct ConstructIgnoringElements {
    pub data: Vec<String>,
}

impl FromElements<String> for ConstructIgnoringElements {
    fn from_elements(_elements: Elements<'_, String>) -> Result<Self, BoxError> {
        Ok(Self { data: Vec::new() })
    }
}

/// Reads everything, then starts over.
#[derive(Debug)]
pub struct ConstructWithElementsTwice {
    pub data: Vec<String>,
}

impl FromElements<String> for ConstructWithElementsTwice {
    fn from_elements(mut elements: Elements<'_, String>) -> Result<Self, BoxError> {
        let data = elements.iter()?.collect::<Result<Vec<_>, _>>()?;
        let again = elements.iter()?.count();
        Ok(Self {
            data: data.into_iter().take(again).collect(),
        })
    }
}

/// Reads everything, then starts over and discards the failure.
#[derive(Debug)]
pub struct ConstructSwallowingSecondPass {
    pub data: Vec<String>,
}

impl FromElements<String> for ConstructSwallowingSecondPass {
    fn from_elements(mut elements: Elements<'_, String>) -> Result<Self, BoxError> {
        let data = elements.iter()?.collect::<Result<Vec<_>, _>>()?;
        let _ = elements.iter();
        Ok(Self { data })
    }
}

/// Takes one element, drops the iterator, then starts over.
#[derive(Debug)]
pub struct ConstructAbandoningFirstPass {
    pub data: Vec<String>,
}

impl FromElements<String> for ConstructAbandoningFirstPass {
    fn from_elements(mut elements: Elements<'_, String>) -> Result<Self, BoxError> {
        let first = elements.iter()?.next().transpose()?;
        let rest = elements.iter()?.collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            data: first.into_iter().chain(rest).collect(),
        })
    }
}

// -----------------------------------------------------------------------------
// Lazy constructors

#[derive(Debug)]
pub struct ConstructWithLazyElements {
    pub data: Vec<String>,
}

#[derive(Debug)]
pub struct AbstractConstructWithLazyElements {
    pub data: Vec<String>,
}

/// Streams only the first element.
#[derive(Debug)]
pub struct ConstructWithLazyElementsIncomplete {
    pub data: Vec<String>,
}

impl FromLazyElements<String> for ConstructWithLazyElementsIncomplete {
    fn from_lazy_elements<'a>(
        elements: LazyElements<'a, String>,
    ) -> BoxFuture<'a, Result<Self, BoxError>> {
        Box::pin(async move {
            let data = elements.into_stream().take(1).try_collect::<Vec<_>>().await?;
            Ok(Self { data })
        })
    }
}

/// A failure surfaced through a wrapper, the way deferred execution
/// reports it.
#[derive(Debug, thiserror::Error)]
#[error("deferred stream failure")]
pub struct Deferred(#[source] pub seqjson::Error);

/// Streams everything, then starts over, reporting the failure wrapped.
#[derive(Debug)]
pub struct ConstructWithLazyElementsTwice {
    pub data: Vec<String>,
}

impl FromLazyElements<String> for ConstructWithLazyElementsTwice {
    fn from_lazy_elements<'a>(
        mut elements: LazyElements<'a, String>,
    ) -> BoxFuture<'a, Result<Self, BoxError>> {
        Box::pin(async move {
            let data = elements
                .stream()?
                .try_collect::<Vec<_>>()
                .await?;
            let mut again = elements.stream().map_err(Deferred)?;
            let _ = again.next().await;
            Ok(Self { data })
        })
    }
}

/// Suspends before taking each element.
#[derive(Debug)]
pub struct ConstructPaced {
    pub data: Vec<String>,
}

impl FromLazyElements<String> for ConstructPaced {
    fn from_lazy_elements<'a>(
        elements: LazyElements<'a, String>,
    ) -> BoxFuture<'a, Result<Self, BoxError>> {
        Box::pin(async move {
            let mut stream = elements.into_stream();
            let mut data = Vec::new();
            loop {
                YieldNow::default().await;
                match stream.next().await {
                    Some(element) => data.push(element?),
                    None => break,
                }
            }
            Ok(Self { data })
        })
    }
}

appendable_word_sequence!(Collection, CollectionWithoutDefault, AbstractCollection);

word_sequence!(
    ConstructWithElements,
    AbstractConstructWithElements,
    ConstructWithElementsIncomplete,
    ConstructIgnoringElements,
    ConstructWithElementsTwice,
    ConstructSwallowingSecondPass,
    ConstructAbandoningFirstPass,
    ConstructWithLazyElements,
    AbstractConstructWithLazyElements,
    ConstructWithLazyElementsIncomplete,
    ConstructWithLazyElementsTwice,
    ConstructPaced,
);

collect_elements!(ConstructWithElements, AbstractConstructWithElements);
stream_elements!(ConstructWithLazyElements, AbstractConstructWithLazyElements);

// -----------------------------------------------------------------------------
// Types the default container converts into

/// A capability extending the lazy-sequence capability.
pub trait Words: AsyncSequence<Item = String> {}

impl Words for SequenceList<String> {}

impl From<SequenceList<String>> for Box<dyn Words> {
    fn from(list: SequenceList<String>) -> Self {
        Box::new(list)
    }
}

/// A capability extending the lazy-sequence capability, with no
/// conversion from the default container.
pub trait Phrase: AsyncSequence<Item = String> {}

/// Declared only as implementing [`Phrase`].
#[derive(Debug)]
pub struct Sentence {
    pub data: Vec<String>,
}

word_sequence!(Sentence);

impl Phrase for Sentence {}

/// A [`Words`] value that refuses appended elements.
#[derive(Debug, Default)]
pub struct Frozen {
    pub data: Vec<String>,
}

word_sequence!(Frozen);

impl Words for Frozen {}

/// Accepts the default container and also has a constructor.
#[derive(Debug)]
pub struct Journal {
    pub data: Vec<String>,
    pub built_by: &'static str,
}

impl From<SequenceList<String>> for Journal {
    fn from(list: SequenceList<String>) -> Self {
        Self {
            data: list.into_vec(),
            built_by: "container",
        }
    }
}

impl FromElements<String> for Journal {
    fn from_elements(elements: Elements<'_, String>) -> Result<Self, BoxError> {
        Ok(Self {
            data: elements.into_iter().collect::<Result<Vec<_>, _>>()?,
            built_by: "constructor",
        })
    }
}

impl AsyncSequence for Journal {
    type Item = String;

    fn elements(&self) -> BoxStream<'_, Result<String, BoxError>> {
        stream_of(&self.data)
    }

    fn as_sink(&mut self) -> Option<&mut dyn Append<String>> {
        Some(&mut self.data)
    }
}

// -----------------------------------------------------------------------------
// Sources

/// Suspends before producing each number.
#[derive(Debug)]
pub struct Trickle {
    pub data: Vec<u32>,
}

impl AsyncSequence for Trickle {
    type Item = u32;

    fn elements(&self) -> BoxStream<'_, Result<u32, BoxError>> {
        stream::iter(self.data.iter().copied())
            .then(|item| async move {
                YieldNow::default().await;
                Ok::<_, BoxError>(item)
            })
            .boxed()
    }
}

/// Produces `0..ok`, then fails.
#[derive(Debug)]
pub struct Failing {
    pub ok: u32,
}

impl AsyncSequence for Failing {
    type Item = u32;

    fn elements(&self) -> BoxStream<'_, Result<u32, BoxError>> {
        stream::iter(0..self.ok)
            .map(Ok)
            .chain(stream::once(async { Err(BoxError::from("upstream closed")) }))
            .boxed()
    }
}

/// A registry describing every type above.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_element::<String>();
    registry.register_element::<u32>();

    registry
        .register::<Collection>()
        .iterable::<String>()
        .default_constructible()
        .appendable::<String>();
    registry
        .register::<CollectionWithoutDefault>()
        .iterable::<String>()
        .appendable::<String>();
    registry
        .register::<AbstractCollection>()
        .kind(TypeKind::Abstract)
        .iterable::<String>()
        .default_constructible()
        .appendable::<String>();

    registry
        .register::<ConstructWithElements>()
        .iterable::<String>()
        .from_elements::<String>();
    registry
        .register::<AbstractConstructWithElements>()
        .kind(TypeKind::Abstract)
        .iterable::<String>()
        .from_elements::<String>();
    registry
        .register::<ConstructWithElementsIncomplete>()
        .iterable::<String>()
        .from_elements::<String>();
    registry
        .register::<ConstructIgnoringElements>()
        .iterable::<String>()
        .from_elements::<String>();
    registry
        .register::<ConstructWithElementsTwice>()
        .iterable::<String>()
        .from_elements::<String>();
    registry
        .register::<ConstructSwallowingSecondPass>()
        .iterable::<String>()
        .from_elements::<String>();

    registry
        .register::<ConstructAbandoningFirstPass>()
        .iterable::<String>()
        .from_elements::<String>();

    registry
        .register::<ConstructWithLazyElements>()
        .iterable::<String>()
        .from_lazy_elements::<String>();
    registry
        .register::<AbstractConstructWithLazyElements>()
        .kind(TypeKind::Abstract)
        .iterable::<String>()
        .from_lazy_elements::<String>();
    registry
        .register::<ConstructWithLazyElementsIncomplete>()
        .iterable::<String>()
        .from_lazy_elements::<String>();
    registry
        .register::<ConstructWithLazyElementsTwice>()
        .iterable::<String>()
        .from_lazy_elements::<String>();
    registry
        .register::<ConstructPaced>()
        .iterable::<String>()
        .from_lazy_elements::<String>();

    registry
        .register::<Box<dyn Words>>()
        .kind(TypeKind::Interface)
        .iterable::<String>()
        .accepts_default_container::<String>();
    registry
        .register::<Journal>()
        .iterable::<String>()
        .accepts_default_container::<String>()
        .from_elements::<String>();

    registry
        .register::<dyn Phrase>()
        .kind(TypeKind::Interface)
        .implements::<DynSequence<String>>();
    registry.register::<Sentence>().implements::<dyn Phrase>();

    registry.register::<Trickle>().iterable::<u32>();
    registry.register::<Failing>().iterable::<u32>();
    registry
}

pub fn converter() -> SequenceConverter {
    SequenceConverter::new(registry())
}
