//! Item key types for the registry.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Semantic type identity of an item.
///
/// Carries the `TypeId` used for lookup and the `type_name` used for
/// diagnostics. Equality and hashing only look at the `TypeId`.
///
/// # Examples
///
/// ```rust
/// use ioc_registry::TypeKey;
///
/// let a = TypeKey::of::<String>();
/// let b = TypeKey::of::<String>();
/// assert_eq!(a, b);
/// assert!(a.name().ends_with("String"));
/// assert!(!a.is_indirection());
/// assert!(TypeKey::of::<Box<String>>().is_indirection());
/// assert!(TypeKey::of::<&'static str>().is_indirection());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

// Prefixes `std::any::type_name` produces for pointer and smart-pointer types.
const INDIRECTION_PREFIXES: &[&str] = &[
    "&",
    "*const ",
    "*mut ",
    "alloc::boxed::Box<",
    "alloc::sync::Arc<",
    "alloc::sync::Weak<",
    "alloc::rc::Rc<",
    "alloc::rc::Weak<",
    "core::ptr::non_null::NonNull<",
    "core::pin::Pin<",
    "std::boxed::Box<",
    "std::sync::Arc<",
    "std::rc::Rc<",
    "std::pin::Pin<",
];

impl TypeKey {
    /// Type key of `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type is a reference, raw pointer or smart pointer.
    ///
    /// Such types are never valid registration keys: items are stored by
    /// value-type identity and consumers ask for indirection through their
    /// `Option<Arc<T>>` fields instead.
    ///
    /// Detection matches prefixes of [`std::any::type_name`], whose output
    /// is not guaranteed to be stable across compiler versions. Wrappers
    /// that are not listed (a newtype around a `Box`, say) are accepted.
    pub fn is_indirection(&self) -> bool {
        INDIRECTION_PREFIXES
            .iter()
            .any(|prefix| self.name.starts_with(prefix))
    }
}

impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lookup key of a registered item: its type, or its registration name.
///
/// Used in errors and observer events.
///
/// # Examples
///
/// ```rust
/// use ioc_registry::{Key, TypeKey};
///
/// let by_type = Key::Type(TypeKey::of::<u32>());
/// assert_eq!(by_type.to_string(), "type 'u32'");
/// assert_eq!(by_type.item_name(), None);
///
/// let by_name = Key::Named("cfg".to_string());
/// assert_eq!(by_name.to_string(), "name 'cfg'");
/// assert_eq!(by_name.item_name(), Some("cfg"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Unnamed item keyed by its type
    Type(TypeKey),
    /// Item registered under an explicit name
    Named(String),
}

impl Key {
    /// The registration name for named items, `None` for type-keyed ones.
    pub fn item_name(&self) -> Option<&str> {
        match self {
            Key::Type(_) => None,
            Key::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(ty) => write!(f, "type '{}'", ty.name()),
            Key::Named(name) => write!(f, "name '{}'", name),
        }
    }
}

/// Type key of `T`.
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeKey::of::<T>())
}
