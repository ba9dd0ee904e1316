//! Item descriptors: the registration record for one item.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::inject::{AnyArc, InjectFieldInfo, Injectable};
use crate::key::{Key, TypeKey};
use crate::lifetime::Lifetime;
use crate::Registry;

/// Heap-allocated instance under construction.
pub type BoxAny = Box<dyn Any + Send + Sync>;

/// Type-erased item constructor.
///
/// Receives the owning registry by shared reference, so it may resolve
/// other items but never register. Returning `None` produces a nil
/// instance, which is not an error.
pub type ItemFactory = Arc<dyn Fn(&Registry) -> Option<BoxAny> + Send + Sync>;

type FieldAssigner = fn(&mut (dyn Any + Send + Sync), &str, AnyArc) -> DiResult<()>;

/// Construction and injection plan of a concrete type, captured when the
/// type is registered and used by the instance builder.
#[derive(Clone, Copy)]
pub(crate) struct Blueprint {
    /// Zero-constructor; `None` for types registered through a factory only
    pub(crate) construct: Option<fn() -> BoxAny>,
    pub(crate) fields: fn() -> Vec<InjectFieldInfo>,
    pub(crate) assign: FieldAssigner,
}

impl Blueprint {
    pub(crate) fn of<T: Injectable>() -> Self {
        Self {
            construct: None,
            fields: T::inject_fields,
            assign: assign_into::<T>,
        }
    }

    pub(crate) fn constructible<T: Injectable + Default>() -> Self {
        Self {
            construct: Some(construct_default::<T>),
            ..Self::of::<T>()
        }
    }
}

fn construct_default<T: Default + Send + Sync + 'static>() -> BoxAny {
    Box::new(T::default())
}

fn assign_into<T: Injectable>(
    target: &mut (dyn Any + Send + Sync),
    field: &str,
    value: AnyArc,
) -> DiResult<()> {
    match target.downcast_mut::<T>() {
        Some(instance) => instance.assign(field, value),
        None => Err(DiError::WrongType {
            item: Key::Type(TypeKey::of::<T>()),
            requested: std::any::type_name::<T>(),
        }),
    }
}

/// Registration record for one item.
///
/// Holds the item's identity, lifetime, how to build it, and its cache
/// slot. Descriptors live behind `Arc`: a Singleton descriptor is the same
/// allocation in the root and in every scope forked from it, which is what
/// makes its cache slot shared.
pub struct ItemDescriptor {
    pub(crate) name: Option<String>,
    pub(crate) item_type: TypeKey,
    pub(crate) lifetime: Lifetime,
    pub(crate) factory: Option<ItemFactory>,
    pub(crate) blueprint: Option<Blueprint>,
    pub(crate) instance: OnceCell<AnyArc>,
}

impl ItemDescriptor {
    pub(crate) fn new(item_type: TypeKey, lifetime: Lifetime) -> Self {
        Self {
            name: None,
            item_type,
            lifetime,
            factory: None,
            blueprint: None,
            instance: OnceCell::new(),
        }
    }

    pub(crate) fn with_factory(mut self, factory: ItemFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub(crate) fn with_blueprint(mut self, blueprint: Blueprint) -> Self {
        self.blueprint = Some(blueprint);
        self
    }

    /// A pre-built value. Named descriptors are always created this way.
    pub(crate) fn with_instance(self, instance: AnyArc) -> Self {
        // A fresh cell cannot already be set.
        let _ = self.instance.set(instance);
        self
    }

    pub(crate) fn named(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Copy with the same identity and constructor but an empty cache slot.
    pub(crate) fn fresh_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            item_type: self.item_type,
            lifetime: self.lifetime,
            factory: self.factory.clone(),
            blueprint: self.blueprint,
            instance: OnceCell::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn item_type(&self) -> TypeKey {
        self.item_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Whether the cache slot holds an instance.
    pub fn is_cached(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Lookup key: the name for named items, the type otherwise.
    pub fn key(&self) -> Key {
        match &self.name {
            Some(name) => Key::Named(name.clone()),
            None => Key::Type(self.item_type),
        }
    }

    pub(crate) fn info(&self) -> DescriptorInfo {
        DescriptorInfo {
            name: self.name.clone(),
            type_name: self.item_type.name(),
            lifetime: self.lifetime,
            cached: self.is_cached(),
        }
    }
}

impl fmt::Debug for ItemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDescriptor")
            .field("name", &self.name)
            .field("item_type", &self.item_type.name())
            .field("lifetime", &self.lifetime)
            .field("factory", &self.factory.is_some())
            .field("cached", &self.is_cached())
            .finish()
    }
}

/// Snapshot of a descriptor for introspection and diagnostics
///
/// # Examples
///
/// ```rust
/// use ioc_registry::{Lifetime, Registry, RegistrationMode};
///
/// let mut registry = Registry::new();
/// registry.register_singleton::<u32>(RegistrationMode::Safe).unwrap();
/// registry.register_by_name("port", 8080u16, RegistrationMode::Safe).unwrap();
///
/// let descriptors = registry.descriptors();
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors[0].type_name, "u32");
/// assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
/// assert!(!descriptors[0].cached);
/// assert_eq!(descriptors[1].name.as_deref(), Some("port"));
/// assert!(descriptors[1].cached);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorInfo {
    /// Registration name for named items
    pub name: Option<String>,
    /// Declared type name
    pub type_name: &'static str,
    pub lifetime: Lifetime,
    /// Whether an instance is currently cached
    pub cached: bool,
}

impl DescriptorInfo {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}
