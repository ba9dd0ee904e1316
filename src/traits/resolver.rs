//! Resolver traits for item resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::inject::AnyArc;
use crate::key::{Key, TypeKey};

/// Core resolver trait for object-safe item resolution.
///
/// Lookups are type-erased: they return the cached or freshly built
/// instance as `Arc<dyn Any>`, or `None` when the item's factory produced
/// a nil instance. Lifetime rules, injection and cycle detection all live
/// behind these two methods.
///
/// Most users should use the [`Resolver`] trait instead, which provides the
/// typed wrappers on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves the unnamed item registered for `item_type`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(AnyArc))` - The resolved instance
    /// * `Ok(None)` - The item's factory produced no instance
    /// * `Err(DiError)` - Resolution error (not found, scope required, circular, etc.)
    fn resolve_by_type(&self, item_type: &TypeKey) -> DiResult<Option<AnyArc>>;

    /// Resolves the item registered under `name`.
    fn resolve_by_name(&self, name: &str) -> DiResult<Option<AnyArc>>;
}

/// High-level resolver interface with typed wrappers.
///
/// Implemented for every [`ResolverCore`], so a root [`Registry`] and a
/// forked scope resolve through the same methods. The typed methods
/// supply the type token and do the single checked downcast on the way
/// out.
///
/// [`Registry`]: crate::Registry
///
/// # Examples
///
/// ```
/// use ioc_registry::{Registry, RegistrationMode, Resolver};
///
/// let mut registry = Registry::new();
/// registry
///     .register_value(42usize, RegistrationMode::Safe).unwrap()
///     .register_by_name("greeting", "hello".to_string(), RegistrationMode::Safe).unwrap();
///
/// assert_eq!(*registry.get::<usize>().unwrap(), 42);
/// assert_eq!(registry.get_named::<String>("greeting").unwrap().as_str(), "hello");
///
/// // Asking for a named item as the wrong type is an error, not a panic
/// assert!(registry.get_named::<usize>("greeting").is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the unnamed item of type `T`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Arc<T>))` - The resolved instance
    /// * `Ok(None)` - The item's factory produced no instance
    /// * `Err(DiError)` - Resolution error
    fn resolve<T: Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        let item_type = TypeKey::of::<T>();
        self.resolve_by_type(&item_type)?
            .map(|any| downcast::<T>(any, Key::Type(item_type)))
            .transpose()
    }

    /// Resolves the item registered under `name` as a `T`.
    fn resolve_named<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Option<Arc<T>>> {
        self.resolve_by_name(name)?
            .map(|any| downcast::<T>(any, Key::Named(name.to_string())))
            .transpose()
    }

    /// Resolves the unnamed item of type `T`, treating a nil instance as
    /// [`DiError::NilInstance`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ioc_registry::{Registry, RegistrationMode, Resolver};
    ///
    /// let mut registry = Registry::new();
    /// registry.register_value("configuration".to_string(), RegistrationMode::Safe).unwrap();
    ///
    /// let config = registry.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve::<T>()?
            .ok_or_else(|| DiError::NilInstance(Key::Type(TypeKey::of::<T>())))
    }

    /// Resolves a named item, treating a nil instance as an error.
    fn get_named<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        self.resolve_named::<T>(name)?
            .ok_or_else(|| DiError::NilInstance(Key::Named(name.to_string())))
    }

    /// Resolves the unnamed item of type `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the item cannot be resolved or resolves to no instance.
    fn get_required<T: Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves a named item, panicking on failure.
    fn get_named_required<T: Send + Sync + 'static>(&self, name: &str) -> Arc<T> {
        self.get_named::<T>(name).unwrap_or_else(|e| {
            panic!("Failed to resolve named {} ({}): {}", std::any::type_name::<T>(), name, e)
        })
    }
}

impl<R: ResolverCore> Resolver for R {}

fn downcast<T: Send + Sync + 'static>(any: AnyArc, item: Key) -> DiResult<Arc<T>> {
    any.downcast::<T>().map_err(|_| DiError::WrongType {
        item,
        requested: std::any::type_name::<T>(),
    })
}
