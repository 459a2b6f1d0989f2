//! Type registry.
//!
//! Rust has no runtime reflection, so every type the converter handles is
//! described up front in a [`TypeRegistry`]: its kind, the capabilities it
//! is assignable to, and typed factory functions for the operations it
//! supports. Registrations are made through the [`Registrar`] builder,
//! whose bounds check at compile time that each declared operation exists.
//!
//! # Example
//!
//! ```ignore
//! use seqjson::{TypeKind, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//!
//! // A mutable container: populated through `Default` + `Extend`.
//! registry
//!     .register::<Bag>()
//!     .iterable::<u32>()
//!     .default_constructible()
//!     .appendable::<u32>();
//!
//! // A capability extending the lazy-sequence capability.
//! registry
//!     .register::<dyn Numbers>()
//!     .kind(TypeKind::Interface)
//!     .implements::<DynSequence<u32>>();
//! ```

mod capability;
mod registration;
mod type_key;

use core::any::TypeId;
use std::collections::{HashMap, HashSet};

pub use capability::{CapabilityResolver, SequenceCapability};
pub(crate) use registration::{
    AppendData, BlankData, ContainerData, LazyCtor, LazyFn, MaterializedCtor, MaterializedFn,
    PopulateFn,
};
pub use registration::{Registrar, TypeRegistration};
pub use type_key::{TypeKey, TypeKind};

/// Registry of the types a converter knows about.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, TypeRegistration>,
    /// Element type to its default container.
    elements: HashMap<TypeId, TypeKey>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, key: TypeKey) -> &mut TypeRegistration {
        self.types
            .entry(key.id())
            .or_insert_with(|| TypeRegistration::new(key))
    }

    /// Starts or extends the registration of `T`.
    pub fn register<T: ?Sized + 'static>(&mut self) -> Registrar<'_, T> {
        Registrar::new(self)
    }

    pub fn get(&self, key: TypeKey) -> Option<&TypeRegistration> {
        self.types.get(&key.id())
    }

    #[inline]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.types.contains_key(&key.id())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeRegistration> {
        self.types.values()
    }

    /// The default container registered for `element`.
    pub fn default_container(&self, element: TypeKey) -> Option<TypeKey> {
        self.elements.get(&element.id()).copied()
    }

    /// Returns true if a value of `from` may stand in for `to`.
    ///
    /// Assignability is nominal: `from` must be `to`, or reach it through
    /// declared [`implements`](Registrar::implements) edges.
    pub fn is_assignable(&self, from: TypeKey, to: TypeKey) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![from];
        while let Some(key) = pending.pop() {
            if key == to {
                return true;
            }
            if !visited.insert(key.id()) {
                continue;
            }
            if let Some(registration) = self.get(key) {
                pending.extend(registration.capabilities().iter().copied());
            }
        }
        false
    }
}
