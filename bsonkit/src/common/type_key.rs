use std::any::{type_name, TypeId};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Identifies a runtime Rust type for registry lookups.
///
/// Equality and hashing use only the [TypeId]; the name is kept for error
/// messages and logging.
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this key identifies `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Key of a parameterized serializer binding: a type constructor applied to
/// one concrete type argument, e.g. `("GeoJsonMultiPointCoordinates", GeoJson2DCoordinates)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GenericTypeKey {
    constructor: &'static str,
    argument: TypeKey,
}

impl GenericTypeKey {
    pub fn new(constructor: &'static str, argument: TypeKey) -> Self {
        GenericTypeKey {
            constructor,
            argument,
        }
    }

    pub fn constructor(&self) -> &'static str {
        self.constructor
    }

    pub fn argument(&self) -> TypeKey {
        self.argument
    }
}

impl Display for GenericTypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}>", self.constructor, self.argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_key_equality() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
        assert!(TypeKey::of::<String>().is::<String>());
    }

    #[test]
    fn test_type_key_hash_ignores_name() {
        let mut set = HashSet::new();
        set.insert(TypeKey::of::<u8>());
        set.insert(TypeKey::of::<u8>());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_generic_type_key_display() {
        let key = GenericTypeKey::new("Wrapper", TypeKey::of::<bool>());
        assert_eq!(key.to_string(), "Wrapper<bool>");
        assert_eq!(key.constructor(), "Wrapper");
        assert_eq!(key.argument(), TypeKey::of::<bool>());
    }

    #[test]
    fn test_generic_type_key_distinguishes_arguments() {
        let a = GenericTypeKey::new("Wrapper", TypeKey::of::<i32>());
        let b = GenericTypeKey::new("Wrapper", TypeKey::of::<i64>());
        let c = GenericTypeKey::new("Other", TypeKey::of::<i32>());
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
