use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Identity of a registered type.
///
/// Works for sized types, trait objects (`dyn Trait`) and boxed interface
/// types alike. Equality and hashing use the [`TypeId`] only; the name is
/// carried for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The compiler-provided name of the type.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// How a registered type can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// An instantiable type.
    #[default]
    Concrete,
    /// A type that exists only as a base for other types.
    Abstract,
    /// A capability contract, typically a trait object.
    Interface,
}

impl TypeKind {
    /// Returns true if constructors of this type may be invoked.
    #[inline]
    pub const fn is_concrete(self) -> bool {
        matches!(self, TypeKind::Concrete)
    }
}
