//! Item registration.
//!
//! Every entry point adds one descriptor to a [`Registry`] and takes a
//! [`RegistrationMode`] deciding what a rejected registration does.

use std::sync::Arc;

use crate::descriptors::{Blueprint, BoxAny, ItemDescriptor, ItemFactory};
use crate::error::{DiError, DiResult};
use crate::inject::Injectable;
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::Registry;

/// What a registration call does when it is rejected.
///
/// Chosen per call, so a bootstrap sequence can fail fast while a plugin
/// loader handles duplicates itself.
///
/// # Examples
///
/// ```
/// use ioc_registry::{DiError, Registry, RegistrationMode};
///
/// let mut registry = Registry::new();
/// registry.register_value(1u32, RegistrationMode::Safe).unwrap();
///
/// let err = registry.register_value(2u32, RegistrationMode::Safe).unwrap_err();
/// assert!(matches!(err, DiError::DuplicateKey(_)));
/// ```
///
/// ```should_panic
/// use ioc_registry::{Registry, RegistrationMode};
///
/// let mut registry = Registry::new();
/// registry.register_value(1u32, RegistrationMode::FailFast).unwrap();
/// registry.register_value(2u32, RegistrationMode::FailFast).unwrap(); // panics
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationMode {
    /// Return the error to the caller
    #[default]
    Safe,
    /// Panic with the error
    FailFast,
}

impl RegistrationMode {
    fn check<T>(self, result: DiResult<T>) -> DiResult<T> {
        match (self, result) {
            (RegistrationMode::FailFast, Err(err)) => panic!("Registration failed: {}", err),
            (_, result) => result,
        }
    }
}

impl Registry {
    // ----- Type registrations -----

    /// Registers `T` as a Singleton, zero-constructed and injected on first use.
    pub fn register_singleton<T: Injectable + Default>(&mut self, mode: RegistrationMode) -> DiResult<&mut Self> {
        self.register_type::<T>(Lifetime::Singleton, mode)
    }

    /// Registers `T` as Scoped, built once per forked registry.
    pub fn register_scoped<T: Injectable + Default>(&mut self, mode: RegistrationMode) -> DiResult<&mut Self> {
        self.register_type::<T>(Lifetime::Scoped, mode)
    }

    /// Registers `T` as Transient, built on every lookup.
    pub fn register_transient<T: Injectable + Default>(&mut self, mode: RegistrationMode) -> DiResult<&mut Self> {
        self.register_type::<T>(Lifetime::Transient, mode)
    }

    /// Registers `T` with the given lifetime.
    ///
    /// Instances start as `T::default()` and then get their `#[inject]`
    /// fields filled.
    pub fn register_type<T: Injectable + Default>(
        &mut self,
        lifetime: Lifetime,
        mode: RegistrationMode,
    ) -> DiResult<&mut Self> {
        let descriptor = ItemDescriptor::new(TypeKey::of::<T>(), lifetime)
            .with_blueprint(Blueprint::constructible::<T>());
        self.insert(descriptor, mode)
    }

    // ----- Factory registrations -----

    /// Registers `T` built by `factory`.
    ///
    /// The factory gets the resolving registry and may look up other items.
    /// Returning `None` is a nil instance: lookups yield `Ok(None)` and,
    /// for cached lifetimes, nothing is stored, so the factory runs again on
    /// the next lookup. `#[inject]` fields of the produced value are filled
    /// after the factory returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use ioc_registry::{Lifetime, Registry, RegistrationMode, Resolver};
    ///
    /// struct Settings {
    ///     port: u16,
    /// }
    /// impl ioc_registry::Injectable for Settings {}
    ///
    /// let mut registry = Registry::new();
    /// registry
    ///     .register_value(8080u16, RegistrationMode::Safe).unwrap()
    ///     .register_factory::<Settings, _>(
    ///         Lifetime::Singleton,
    ///         |registry| Some(Settings { port: *registry.get::<u16>().ok()? }),
    ///         RegistrationMode::Safe,
    ///     ).unwrap();
    ///
    /// assert_eq!(registry.get::<Settings>().unwrap().port, 8080);
    /// ```
    pub fn register_factory<T, F>(&mut self, lifetime: Lifetime, factory: F, mode: RegistrationMode) -> DiResult<&mut Self>
    where
        T: Injectable,
        F: Fn(&Registry) -> Option<T> + Send + Sync + 'static,
    {
        let factory: ItemFactory = Arc::new(move |registry: &Registry| {
            factory(registry).map(|value| Box::new(value) as BoxAny)
        });
        let descriptor = ItemDescriptor::new(TypeKey::of::<T>(), lifetime)
            .with_factory(factory)
            .with_blueprint(Blueprint::of::<T>());
        self.insert(descriptor, mode)
    }

    /// Registers a type-erased factory for `item_type`.
    ///
    /// The factory must produce values of `item_type`; typed lookups fail
    /// with [`DiError::WrongType`] otherwise. No field injection happens on
    /// its results. A missing factory is rejected with
    /// [`DiError::InvalidRegistration`].
    pub fn register_factory_fn(
        &mut self,
        item_type: TypeKey,
        lifetime: Lifetime,
        factory: Option<ItemFactory>,
        mode: RegistrationMode,
    ) -> DiResult<&mut Self> {
        let Some(factory) = factory else {
            return mode
                .check(Err(DiError::InvalidRegistration {
                    item: item_type.name().to_string(),
                    reason: "a factory is required",
                }))
                .map(|()| self);
        };
        self.insert(ItemDescriptor::new(item_type, lifetime).with_factory(factory), mode)
    }

    /// Declares `item_type` without any way to build it.
    ///
    /// The key is reserved, so later registrations of the same type are
    /// duplicates, but resolving it fails with [`DiError::UnknownType`].
    pub fn declare(&mut self, item_type: TypeKey, lifetime: Lifetime, mode: RegistrationMode) -> DiResult<&mut Self> {
        self.insert(ItemDescriptor::new(item_type, lifetime), mode)
    }

    // ----- Value registrations -----

    /// Registers a pre-built value as the Singleton of its type.
    ///
    /// The value is handed out as is; no field injection happens.
    pub fn register_value<T: Send + Sync + 'static>(&mut self, value: T, mode: RegistrationMode) -> DiResult<&mut Self> {
        let descriptor = ItemDescriptor::new(TypeKey::of::<T>(), Lifetime::Singleton).with_instance(Arc::new(value));
        self.insert(descriptor, mode)
    }

    /// Registers a pre-built value under `name`.
    ///
    /// Named items are always Singletons and are shared with every scope.
    /// The name space is separate from the type space: a named `u16` and
    /// the unnamed `u16` coexist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ioc_registry::{Registry, RegistrationMode, Resolver};
    /// use std::sync::Arc;
    ///
    /// let mut registry = Registry::new();
    /// registry.register_by_name("db_url", "postgres://localhost".to_string(), RegistrationMode::Safe).unwrap();
    ///
    /// let registry = Arc::new(registry);
    /// let scope = registry.fork().unwrap();
    /// let a = registry.get_named::<String>("db_url").unwrap();
    /// let b = scope.get_named::<String>("db_url").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn register_by_name<T: Send + Sync + 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
        mode: RegistrationMode,
    ) -> DiResult<&mut Self> {
        self.register_arc_by_name(name, Arc::new(value), mode)
    }

    /// Registers an already shared value under `name`.
    ///
    /// The `Arc` is stored as given and the item's type is `T`, so every
    /// lookup of `name` hands out a clone of this very `Arc`.
    ///
    /// ```
    /// use ioc_registry::{Registry, RegistrationMode, Resolver};
    /// use std::sync::Arc;
    ///
    /// let shared = Arc::new(8080u16);
    /// let mut registry = Registry::new();
    /// registry.register_arc_by_name("port", shared.clone(), RegistrationMode::Safe).unwrap();
    ///
    /// assert!(Arc::ptr_eq(&shared, &registry.get_named::<u16>("port").unwrap()));
    /// ```
    pub fn register_arc_by_name<T: Send + Sync + 'static>(
        &mut self,
        name: impl Into<String>,
        value: Arc<T>,
        mode: RegistrationMode,
    ) -> DiResult<&mut Self> {
        let name = name.into();
        if name.is_empty() {
            return mode
                .check(Err(DiError::InvalidRegistration {
                    item: std::any::type_name::<T>().to_string(),
                    reason: "item name must not be empty",
                }))
                .map(|()| self);
        }

        let descriptor = ItemDescriptor::new(TypeKey::of::<T>(), Lifetime::Singleton)
            .named(name)
            .with_instance(value);
        self.insert(descriptor, mode)
    }

    fn insert(&mut self, descriptor: ItemDescriptor, mode: RegistrationMode) -> DiResult<&mut Self> {
        let inserted = mode.check(self.store.insert(descriptor))?;
        tracing::debug!(item = %inserted.key(), lifetime = %inserted.lifetime, "registered item");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::traits::Resolver;

    #[test]
    fn missing_factory_is_invalid() {
        let mut registry = Registry::new();
        let err = registry
            .register_factory_fn(TypeKey::of::<u8>(), Lifetime::Transient, None, RegistrationMode::Safe)
            .unwrap_err();
        assert!(matches!(err, DiError::InvalidRegistration { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn declared_types_cannot_be_built() {
        let mut registry = Registry::new();
        registry
            .declare(TypeKey::of::<u8>(), Lifetime::Singleton, RegistrationMode::Safe)
            .unwrap();

        assert!(matches!(registry.get::<u8>(), Err(DiError::UnknownType(Key::Type(_)))));
        assert!(matches!(
            registry.register_value(1u8, RegistrationMode::Safe),
            Err(DiError::DuplicateKey(_))
        ));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_by_name("", 1u8, RegistrationMode::Safe)
            .unwrap_err();
        assert!(matches!(err, DiError::InvalidRegistration { .. }));
    }

    #[test]
    #[should_panic(expected = "Registration failed")]
    fn fail_fast_panics_on_pointer_keys() {
        let mut registry = Registry::new();
        let _ = registry.register_value(Box::new(1u8), RegistrationMode::FailFast);
    }

    #[test]
    fn erased_factory_results_are_downcast_on_lookup() {
        let mut registry = Registry::new();
        let factory: ItemFactory = Arc::new(|_: &Registry| Some(Box::new(5u32) as BoxAny));
        registry
            .register_factory_fn(TypeKey::of::<u32>(), Lifetime::Transient, Some(factory), RegistrationMode::Safe)
            .unwrap();

        assert_eq!(*registry.get::<u32>().unwrap(), 5);
    }
}
