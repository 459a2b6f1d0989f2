//! Construction-strategy selection.
//!
//! [`select`] decides once per target type how a read obtains a populated
//! instance. Rules are tried in order and the first match wins:
//!
//! | # | Condition | Strategy |
//! |---|-----------|----------|
//! | 1 | the default container of the element type is assignable to the target | [`Mutable`](ConstructionStrategy::Mutable), via the container's blank constructor |
//! | 2 | concrete, zero-argument constructor and append capability | [`Mutable`](ConstructionStrategy::Mutable) |
//! | 3 | concrete, constructor taking an eagerly traversable sequence | [`FromMaterialized`](ConstructionStrategy::FromMaterialized) |
//! | 4 | concrete, constructor taking a lazily produced sequence | [`FromLazy`](ConstructionStrategy::FromLazy) |
//! | 5 | otherwise | [`Unsupported`](ConstructionStrategy::Unsupported) |
//!
//! Selected strategies are kept in a [`StrategyCache`].

use core::any::{Any, TypeId};
use core::fmt;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use futures::future::BoxFuture;

use crate::adapter::ElementCursor;
use crate::config::ElementBudget;
use crate::registry::{
    AppendData, BlankData, ContainerData, LazyCtor, LazyFn, MaterializedCtor, MaterializedFn,
    PopulateFn, SequenceCapability, TypeKey, TypeRegistry,
};
use crate::traits::TokenReader;
use crate::{BoxError, Error};

/// Creates blank instances and populates them by appending elements.
pub struct MutableFactory<T> {
    blank: fn() -> T,
    populate: PopulateFn<T>,
}

impl<T> MutableFactory<T> {
    /// Creates an empty instance.
    #[inline]
    pub fn blank(&self) -> T {
        (self.blank)()
    }

    /// Appends every remaining element of the array to `target`.
    pub fn populate(
        &self,
        target: &mut T,
        reader: &mut dyn TokenReader,
        budget: &mut ElementBudget,
    ) -> Result<(), Error> {
        (self.populate)(target, reader, budget)
    }
}

/// Invokes a constructor taking an eagerly traversable sequence.
pub struct MaterializedFactory<T> {
    build: MaterializedFn<T>,
}

impl<T> MaterializedFactory<T> {
    pub fn build(&self, cursor: ElementCursor<'_>) -> Result<T, BoxError> {
        (self.build)(cursor)
    }
}

/// Invokes a constructor taking a lazily produced sequence.
pub struct LazyFactory<T> {
    build: LazyFn<T>,
}

impl<T> LazyFactory<T> {
    pub fn build<'a>(&self, cursor: ElementCursor<'a>) -> BoxFuture<'a, Result<T, BoxError>> {
        (self.build)(cursor)
    }
}

/// How a read obtains a populated instance of `T`.
pub enum ConstructionStrategy<T> {
    /// Populate an existing or blank instance by appending elements.
    Mutable(MutableFactory<T>),
    /// Build through a constructor taking an eagerly traversable sequence.
    FromMaterialized(MaterializedFactory<T>),
    /// Build through a constructor taking a lazily produced sequence.
    FromLazy(LazyFactory<T>),
    /// No way to obtain an instance.
    Unsupported,
}

impl<T> ConstructionStrategy<T> {
    /// Returns true if instances can be populated by appending elements.
    #[inline]
    pub fn can_populate(&self) -> bool {
        matches!(self, ConstructionStrategy::Mutable(_))
    }

    /// Returns true if instances can only be built through a constructor.
    #[inline]
    pub fn can_construct(&self) -> bool {
        matches!(
            self,
            ConstructionStrategy::FromMaterialized(_) | ConstructionStrategy::FromLazy(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConstructionStrategy::Mutable(_) => "mutable",
            ConstructionStrategy::FromMaterialized(_) => "from_materialized",
            ConstructionStrategy::FromLazy(_) => "from_lazy",
            ConstructionStrategy::Unsupported => "unsupported",
        }
    }
}

macro_rules! impl_copy {
    ($($ty:ident),* $(,)?) => {$(
        impl<T> Clone for $ty<T> {
            #[inline]
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $ty<T> {}
    )*};
}

impl_copy!(MutableFactory, MaterializedFactory, LazyFactory, ConstructionStrategy);

impl<T> fmt::Debug for ConstructionStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructionStrategy::{}", self.name())
    }
}

/// Chooses the construction strategy for `T`.
///
/// `capability` must be the resolved capability of `T`. Fails with
/// [`Error::Internal`] if `T` is not registered.
pub fn select<T: 'static>(
    registry: &TypeRegistry,
    capability: SequenceCapability,
) -> Result<ConstructionStrategy<T>, Error> {
    let key = TypeKey::of::<T>();
    let element = capability.element();
    let registration = registry
        .get(key)
        .ok_or_else(|| Error::Internal(format!("`{}` is not a registered type", key.name())))?;

    if let Some(container) = registration.data::<ContainerData<T>>() {
        let assignable = registry
            .default_container(element)
            .is_some_and(|list| registry.is_assignable(list, key));
        if assignable && container.element == element {
            return Ok(ConstructionStrategy::Mutable(MutableFactory {
                blank: container.blank,
                populate: container.populate,
            }));
        }
    }

    // Abstract and interface types have no constructor to invoke.
    if !registration.kind().is_concrete() {
        return Ok(ConstructionStrategy::Unsupported);
    }

    if let (Some(blank), Some(append)) = (
        registration.data::<BlankData<T>>(),
        registration.data::<AppendData<T>>(),
    ) {
        if append.element == element {
            return Ok(ConstructionStrategy::Mutable(MutableFactory {
                blank: blank.blank,
                populate: append.populate,
            }));
        }
    }

    if let Some(ctor) = registration.data::<MaterializedCtor<T>>() {
        if ctor.element == element {
            return Ok(ConstructionStrategy::FromMaterialized(MaterializedFactory {
                build: ctor.build,
            }));
        }
    }

    if let Some(ctor) = registration.data::<LazyCtor<T>>() {
        if ctor.element == element {
            return Ok(ConstructionStrategy::FromLazy(LazyFactory { build: ctor.build }));
        }
    }

    Ok(ConstructionStrategy::Unsupported)
}

/// Selected strategies, keyed by target type.
///
/// Lookups take a shared lock. A miss selects outside the lock and then
/// publishes; when two callers race on the same type the first published
/// entry is kept. Failed selections are not cached.
#[derive(Default)]
pub struct StrategyCache {
    entries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl StrategyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached strategy for `T`, selecting it on first use.
    pub fn get_or_select<T: 'static>(
        &self,
        registry: &TypeRegistry,
        capability: SequenceCapability,
    ) -> Result<ConstructionStrategy<T>, Error> {
        let id = TypeId::of::<T>();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(strategy) = entries
                .get(&id)
                .and_then(|entry| (**entry).downcast_ref::<ConstructionStrategy<T>>())
            {
                return Ok(*strategy);
            }
        }

        let selected = select::<T>(registry, capability)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id).or_insert_with(|| {
            tracing::debug!(
                type_name = core::any::type_name::<T>(),
                strategy = selected.name(),
                "selected construction strategy"
            );
            let boxed: Box<dyn Any + Send + Sync> = Box::new(selected);
            boxed
        });
        (**entry)
            .downcast_ref::<ConstructionStrategy<T>>()
            .copied()
            .ok_or_else(|| Error::Internal("strategy cache entry has the wrong type".into()))
    }

    /// Number of cached strategies.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for StrategyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyCache")
            .field("len", &self.len())
            .finish()
    }
}
