use core::any::{Any, TypeId};
use core::marker::PhantomData;
use std::collections::HashMap;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use crate::adapter::{self, ElementCursor, Elements, LazyElements};
use crate::config::ElementBudget;
use crate::list::SequenceList;
use crate::traits::{
    Append, AsyncSequence, DynSequence, Element, FromElements, FromLazyElements, TokenReader,
};
use crate::{BoxError, Error};

use super::{TypeKey, TypeKind, TypeRegistry};

pub(crate) type PopulateFn<T> =
    fn(&mut T, &mut dyn TokenReader, &mut ElementBudget) -> Result<(), Error>;

pub(crate) type MaterializedFn<T> = for<'a> fn(ElementCursor<'a>) -> Result<T, BoxError>;

pub(crate) type LazyFn<T> = for<'a> fn(ElementCursor<'a>) -> BoxFuture<'a, Result<T, BoxError>>;

/// Zero-argument constructor.
pub(crate) struct BlankData<T> {
    pub blank: fn() -> T,
}

/// Appends decoded elements to an instance.
pub(crate) struct AppendData<T> {
    pub element: TypeKey,
    pub populate: PopulateFn<T>,
}

/// Present on types the default container of `element` converts into.
pub(crate) struct ContainerData<T> {
    pub element: TypeKey,
    pub blank: fn() -> T,
    pub populate: PopulateFn<T>,
}

/// Constructor taking an eagerly traversable sequence.
pub(crate) struct MaterializedCtor<T> {
    pub element: TypeKey,
    pub build: MaterializedFn<T>,
}

/// Constructor taking a lazily produced sequence.
pub(crate) struct LazyCtor<T> {
    pub element: TypeKey,
    pub build: LazyFn<T>,
}

fn populate_as<T, E>(
    target: &mut T,
    reader: &mut dyn TokenReader,
    budget: &mut ElementBudget,
) -> Result<(), Error>
where
    T: Append<E>,
    E: DeserializeOwned,
{
    adapter::populate::<E, T, _>(target, reader, budget)
}

fn populate_sink<T, E>(
    target: &mut T,
    reader: &mut dyn TokenReader,
    budget: &mut ElementBudget,
) -> Result<(), Error>
where
    T: AsyncSequence<Item = E>,
    E: DeserializeOwned,
{
    match target.as_sink() {
        Some(sink) => adapter::populate::<E, _, _>(sink, reader, budget),
        None => Err(Error::NotAppendable {
            type_name: core::any::type_name::<T>(),
        }),
    }
}

fn from_default_container<T, E>() -> T
where
    T: From<SequenceList<E>>,
{
    T::from(SequenceList::new())
}

fn build_materialized<T, E>(cursor: ElementCursor<'_>) -> Result<T, BoxError>
where
    T: FromElements<E>,
{
    T::from_elements(Elements::new(cursor))
}

fn build_lazy<T, E>(cursor: ElementCursor<'_>) -> BoxFuture<'_, Result<T, BoxError>>
where
    T: FromLazyElements<E>,
{
    T::from_lazy_elements(LazyElements::new(cursor))
}

/// Everything the registry knows about one type.
pub struct TypeRegistration {
    key: TypeKey,
    kind: TypeKind,
    capabilities: Vec<TypeKey>,
    sequence_of: Option<TypeKey>,
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TypeRegistration {
    pub(crate) fn new(key: TypeKey) -> Self {
        Self {
            key,
            kind: TypeKind::default(),
            capabilities: Vec::new(),
            sequence_of: None,
            data: HashMap::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Keys this type directly declares itself assignable to, in
    /// registration order.
    #[inline]
    pub fn capabilities(&self) -> &[TypeKey] {
        &self.capabilities
    }

    /// The element type, if this type *is* the lazy-sequence capability.
    #[inline]
    pub fn sequence_of(&self) -> Option<TypeKey> {
        self.sequence_of
    }

    pub(crate) fn data<D: Any>(&self) -> Option<&D> {
        self.data
            .get(&TypeId::of::<D>())
            .and_then(|data| (**data).downcast_ref::<D>())
    }

    fn insert_data<D: Any + Send + Sync>(&mut self, data: D) {
        self.data.insert(TypeId::of::<D>(), Box::new(data));
    }

    fn add_capability(&mut self, capability: TypeKey) {
        if capability != self.key && !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
    }
}

impl core::fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("capabilities", &self.capabilities)
            .field("sequence_of", &self.sequence_of)
            .field("data", &self.data.len())
            .finish()
    }
}

/// Builder returned by [`TypeRegistry::register`].
///
/// Each call adds to the registration of `T`; registering the same type
/// again merges into the existing entry.
///
/// # Example
///
/// ```ignore
/// let mut registry = TypeRegistry::new();
/// registry
///     .register::<Words>()
///     .iterable::<String>()
///     .from_elements::<String>();
/// ```
pub struct Registrar<'r, T: ?Sized> {
    registry: &'r mut TypeRegistry,
    key: TypeKey,
    _marker: PhantomData<fn(&T)>,
}

impl<'r, T: ?Sized + 'static> Registrar<'r, T> {
    pub(crate) fn new(registry: &'r mut TypeRegistry) -> Self {
        let key = TypeKey::of::<T>();
        registry.entry(key);
        Self {
            registry,
            key,
            _marker: PhantomData,
        }
    }

    fn registration(&mut self) -> &mut TypeRegistration {
        self.registry.entry(self.key)
    }

    /// Sets how the type can be instantiated. Defaults to
    /// [`TypeKind::Concrete`].
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.registration().kind = kind;
        self
    }

    /// Declares that `T` is assignable to `U`.
    ///
    /// `U` is typically a capability trait object (`dyn Trait`) or a base
    /// type whose registration carries the sequence capability.
    pub fn implements<U: ?Sized + 'static>(mut self) -> Self {
        self.registration().add_capability(TypeKey::of::<U>());
        self
    }

    /// Marks `T` as the lazy-sequence capability itself, producing `E`.
    pub fn sequence_of<E: 'static>(mut self) -> Self {
        self.registration().sequence_of = Some(TypeKey::of::<E>());
        self
    }
}

impl<'r, T: 'static> Registrar<'r, T> {
    fn container<E: Element>(mut self, blank: fn() -> T, populate: PopulateFn<T>) -> Self {
        self.registration().insert_data(ContainerData {
            element: TypeKey::of::<E>(),
            blank,
            populate,
        });
        self
    }

    /// Declares that `T` produces a lazy sequence of `E`.
    ///
    /// Equivalent to `implements::<DynSequence<E>>()`, after registering
    /// the built-in types for `E`.
    pub fn iterable<E>(self) -> Self
    where
        T: AsyncSequence<Item = E>,
        E: Element,
    {
        self.registry.register_element::<E>();
        self.implements::<DynSequence<E>>()
    }

    /// Registers `T`'s zero-argument constructor.
    pub fn default_constructible(mut self) -> Self
    where
        T: Default,
    {
        self.registration()
            .insert_data(BlankData::<T> { blank: T::default });
        self
    }

    /// Registers `T` as accepting appended elements of `E`.
    ///
    /// This covers reads whose target type is `T`. A `T` handed over as an
    /// existing [`DynSequence<E>`] is appended to through
    /// [`AsyncSequence::as_sink`], which `T` must override for that.
    pub fn appendable<E>(mut self) -> Self
    where
        T: Append<E>,
        E: Element,
    {
        self.registration().insert_data(AppendData::<T> {
            element: TypeKey::of::<E>(),
            populate: populate_as::<T, E>,
        });
        self
    }

    /// Registers `T`'s constructor taking an eagerly traversable sequence.
    pub fn from_elements<E>(mut self) -> Self
    where
        T: FromElements<E>,
        E: Element,
    {
        self.registration().insert_data(MaterializedCtor::<T> {
            element: TypeKey::of::<E>(),
            build: build_materialized::<T, E>,
        });
        self
    }

    /// Registers `T`'s constructor taking a lazily produced sequence.
    pub fn from_lazy_elements<E>(mut self) -> Self
    where
        T: FromLazyElements<E>,
        E: Element,
    {
        self.registration().insert_data(LazyCtor::<T> {
            element: TypeKey::of::<E>(),
            build: build_lazy::<T, E>,
        });
        self
    }

    /// Declares that the default container of `E` converts into `T`.
    ///
    /// Reads into `T` then start from an empty default container, and
    /// populating an existing `T` goes through [`AsyncSequence::as_sink`].
    pub fn accepts_default_container<E>(mut self) -> Self
    where
        T: From<SequenceList<E>> + AsyncSequence<Item = E>,
        E: Element,
    {
        self.registry.register_element::<E>();
        self.registry
            .register::<SequenceList<E>>()
            .implements::<T>();
        self.container::<E>(from_default_container::<T, E>, populate_sink::<T, E>)
    }
}

fn blank_dyn<E: Element>() -> DynSequence<E> {
    Box::new(SequenceList::<E>::new())
}

impl TypeRegistry {
    /// Registers the built-in types for element type `E`.
    ///
    /// These are the capability itself ([`DynSequence<E>`]) and the default
    /// container ([`SequenceList<E>`]). Called implicitly whenever a type
    /// is declared iterable over `E`.
    pub fn register_element<E: Element>(&mut self) {
        let element = TypeKey::of::<E>();
        if self.elements.contains_key(&element.id()) {
            return;
        }
        self.elements
            .insert(element.id(), TypeKey::of::<SequenceList<E>>());

        self.register::<DynSequence<E>>()
            .kind(TypeKind::Interface)
            .sequence_of::<E>()
            .container::<E>(blank_dyn::<E>, populate_sink::<DynSequence<E>, E>);

        self.register::<SequenceList<E>>()
            .iterable::<E>()
            .default_constructible()
            .appendable::<E>()
            .container::<E>(SequenceList::new, populate_as::<SequenceList<E>, E>);
    }
}
