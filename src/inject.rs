//! Field injection contract.
//!
//! A type takes part in field injection by implementing [`Injectable`],
//! normally through `#[derive(Injectable)]`. The derive reads `#[inject]`
//! markers on named fields:
//!
//! - `#[inject]` or `#[inject("")]` resolves the field by its target type
//! - `#[inject("cfg")]` or `#[inject(name = "cfg")]` resolves the item named `cfg`
//!
//! Injectable fields must be `Option<Arc<T>>`. The builder zero-constructs
//! the value (fields start as `None`) and then stores the resolved `Arc`,
//! so the field shares the registry's instance instead of copying it.
//!
//! ```rust
//! use ioc_registry::{Injectable, Registry, RegistrationMode, Resolver};
//! use std::sync::Arc;
//!
//! #[derive(Default, Injectable)]
//! struct Database {
//!     url: String,
//! }
//!
//! #[derive(Default, Injectable)]
//! struct UserService {
//!     #[inject]
//!     db: Option<Arc<Database>>,
//! }
//!
//! let mut registry = Registry::new();
//! registry
//!     .register_value(Database { url: "postgres://localhost".to_string() }, RegistrationMode::Safe)
//!     .unwrap()
//!     .register_transient::<UserService>(RegistrationMode::Safe)
//!     .unwrap();
//!
//! let service = registry.get::<UserService>().unwrap();
//! assert_eq!(service.db.as_ref().unwrap().url, "postgres://localhost");
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

/// Type-erased shared instance as stored in cache slots.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// One `#[inject]` field of an injectable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectFieldInfo {
    field_name: &'static str,
    field_type: &'static str,
    target: Option<TypeKey>,
    item_name: Option<&'static str>,
}

impl InjectFieldInfo {
    /// Describes a field.
    ///
    /// `target` is the `T` of an `Option<Arc<T>>` field and `None` when the
    /// field is not an indirection. An empty `item_name` is treated as
    /// absent.
    pub fn new(
        field_name: &'static str,
        field_type: &'static str,
        target: Option<TypeKey>,
        item_name: Option<&'static str>,
    ) -> Self {
        Self {
            field_name,
            field_type,
            target,
            item_name: item_name.filter(|name| !name.is_empty()),
        }
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Declared type of the field, as written.
    pub fn field_type(&self) -> &'static str {
        self.field_type
    }

    /// Dereferenced target type, `None` if the field is not an `Option<Arc<_>>`.
    pub fn target(&self) -> Option<TypeKey> {
        self.target
    }

    /// Explicit item name; `None` means resolve by type.
    pub fn item_name(&self) -> Option<&'static str> {
        self.item_name
    }
}

/// Types the registry can construct and wire.
///
/// Both methods have defaults describing a type with no injectable
/// fields, so leaf types only need an empty `impl`.
pub trait Injectable: Any + Send + Sync {
    /// Fields marked for injection, in declaration order.
    fn inject_fields() -> Vec<InjectFieldInfo>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Stores a resolved dependency into the named field.
    fn assign(&mut self, field: &str, _value: AnyArc) -> DiResult<()> {
        Err(DiError::InvalidInjectionTarget {
            field: field.to_string(),
            field_type: "<not injectable>",
        })
    }
}

macro_rules! leaf_injectable {
    ($($ty:ty),* $(,)?) => {
        $(impl Injectable for $ty {})*
    };
}

leaf_injectable!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
);

impl<T: Send + Sync + 'static> Injectable for Vec<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_item_name_means_by_type() {
        let info = InjectFieldInfo::new("db", "Option<Arc<Db>>", Some(TypeKey::of::<u8>()), Some(""));
        assert_eq!(info.item_name(), None);

        let named = InjectFieldInfo::new("db", "Option<Arc<Db>>", None, Some("primary"));
        assert_eq!(named.item_name(), Some("primary"));
        assert_eq!(named.target(), None);
    }

    #[test]
    fn leaf_types_have_no_fields() {
        assert!(String::inject_fields().is_empty());
        assert!(<Vec<u8>>::inject_fields().is_empty());

        let mut value = 7u32;
        let err = value.assign("anything", Arc::new(1u8)).unwrap_err();
        assert!(matches!(err, DiError::InvalidInjectionTarget { .. }));
    }
}
