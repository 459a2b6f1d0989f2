use core::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use super::{TypeKey, TypeRegistry};

/// Proof that a type produces a lazy sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceCapability {
    capability: TypeKey,
    element: TypeKey,
}

impl SequenceCapability {
    /// The registered type that *is* the capability.
    #[inline]
    pub fn capability(&self) -> TypeKey {
        self.capability
    }

    /// The element type of the sequence.
    #[inline]
    pub fn element(&self) -> TypeKey {
        self.element
    }
}

/// Memoizing search for the sequence capability of a type.
///
/// A type has the capability if its registration *is* the capability, or
/// if any type it implements has it, transitively. The first capability
/// found in registration order wins. Outcomes, including "none", are cached
/// per type for the lifetime of the resolver.
#[derive(Debug, Default)]
pub struct CapabilityResolver {
    cache: RwLock<HashMap<TypeId, Option<SequenceCapability>>>,
}

impl CapabilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the capability of `key`.
    pub fn resolve(&self, registry: &TypeRegistry, key: TypeKey) -> Option<SequenceCapability> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(&key.id()) {
                return *cached;
            }
        }

        let mut visited = HashSet::new();
        let found = search(registry, key, &mut visited);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache.entry(key.id()).or_insert_with(|| {
            match found {
                Some(capability) => tracing::debug!(
                    type_name = key.name(),
                    element = capability.element.name(),
                    "resolved sequence capability"
                ),
                None => tracing::debug!(type_name = key.name(), "type is not a sequence"),
            }
            found
        })
    }

    /// Returns true if `key` has the sequence capability.
    #[inline]
    pub fn is_sequence_type(&self, registry: &TypeRegistry, key: TypeKey) -> bool {
        self.resolve(registry, key).is_some()
    }

    /// Number of memoized outcomes.
    pub fn cached(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn search(
    registry: &TypeRegistry,
    key: TypeKey,
    visited: &mut HashSet<TypeId>,
) -> Option<SequenceCapability> {
    if !visited.insert(key.id()) {
        return None;
    }
    let registration = registry.get(key)?;
    if let Some(element) = registration.sequence_of() {
        return Some(SequenceCapability {
            capability: key,
            element,
        });
    }
    registration
        .capabilities()
        .iter()
        .find_map(|capability| search(registry, *capability, visited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DynSequence;

    #[test]
    fn test_capability_itself() {
        let mut registry = TypeRegistry::new();
        registry.register_element::<u8>();
        let resolver = CapabilityResolver::new();

        let found = resolver
            .resolve(&registry, TypeKey::of::<DynSequence<u8>>())
            .unwrap();
        assert_eq!(found.capability(), TypeKey::of::<DynSequence<u8>>());
        assert_eq!(found.element(), TypeKey::of::<u8>());
    }

    #[test]
    fn test_none_is_memoized() {
        let registry = TypeRegistry::new();
        let resolver = CapabilityResolver::new();
        assert!(!resolver.is_sequence_type(&registry, TypeKey::of::<String>()));
        assert!(!resolver.is_sequence_type(&registry, TypeKey::of::<String>()));
        assert_eq!(resolver.cached(), 1);
    }

    #[test]
    fn test_cycle_terminates() {
        struct Ping;
        struct Pong;

        let mut registry = TypeRegistry::new();
        registry.register::<Ping>().implements::<Pong>();
        registry.register::<Pong>().implements::<Ping>();
        let resolver = CapabilityResolver::new();
        assert!(resolver.resolve(&registry, TypeKey::of::<Ping>()).is_none());
    }

    #[test]
    fn test_first_capability_in_registration_order_wins() {
        struct Both;

        let mut registry = TypeRegistry::new();
        registry.register_element::<u8>();
        registry.register_element::<u16>();
        registry
            .register::<Both>()
            .implements::<DynSequence<u16>>()
            .implements::<DynSequence<u8>>();

        let resolver = CapabilityResolver::new();
        let found = resolver.resolve(&registry, TypeKey::of::<Both>()).unwrap();
        assert_eq!(found.element(), TypeKey::of::<u16>());
    }
}
