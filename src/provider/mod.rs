//! Registry and lifetime resolution.
//!
//! This module contains the [`Registry`] type: the descriptor set of one
//! registry plus the rules deciding, per lifetime, whether a lookup returns
//! a cached instance, builds and caches one, or builds a fresh one.

use std::fmt;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::descriptors::{DescriptorInfo, ItemDescriptor};
use crate::error::{DiError, DiResult};
use crate::inject::AnyArc;
use crate::key::{Key, TypeKey};
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, LoggingObserver, Observers};
use crate::registration::DescriptorStore;
use crate::traits::ResolverCore;

mod builder;
mod scope;

/// Inversion-of-control registry.
///
/// A root registry is built up with the `register_*` methods and then
/// resolved from, possibly from many threads. Per unit of work (typically
/// a request) the root, shared behind an `Arc`, is [forked](Registry::fork)
/// into a scope: Singleton instances are shared with the root, Scoped
/// instances live as long as the scope does.
///
/// Registration takes `&mut self`; resolution takes `&self`. Registering
/// after the first resolution is allowed and only adds new descriptors.
///
/// # Examples
///
/// ```
/// use ioc_registry::{Injectable, Registry, RegistrationMode, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default, Injectable)]
/// struct Database {
///     url: String,
/// }
///
/// #[derive(Default, Injectable)]
/// struct UserService {
///     #[inject]
///     db: Option<Arc<Database>>,
/// }
///
/// let mut registry = Registry::new();
/// registry.register_factory::<Database, _>(
///     ioc_registry::Lifetime::Singleton,
///     |_| Some(Database { url: "postgres://localhost".to_string() }),
///     RegistrationMode::Safe,
/// ).unwrap();
/// registry.register_scoped::<UserService>(RegistrationMode::Safe).unwrap();
///
/// let scope = Arc::new(registry).fork().unwrap();
/// let service = scope.get::<UserService>().unwrap();
/// assert_eq!(service.db.as_ref().unwrap().url, "postgres://localhost");
/// ```
pub struct Registry {
    pub(crate) store: DescriptorStore,
    pub(crate) scoped: bool,
    pub(crate) master: Option<Arc<Registry>>,
    pub(crate) observers: Observers,
    pub(crate) config: RegistryConfig,
}

impl Registry {
    /// Creates an empty root registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty root registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self {
            store: DescriptorStore::new(),
            scoped: false,
            master: None,
            observers: Observers::default(),
            config,
        };
        if registry.config.log_resolutions {
            registry.add_observer(Arc::new(LoggingObserver::new()));
        }
        registry
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Attaches an observer to this registry and to every scope forked from
    /// it afterwards.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Whether this registry was produced by [`fork`](Registry::fork).
    pub fn is_scoped(&self) -> bool {
        self.scoped
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Whether an unnamed item of type `T` is registered.
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.store.contains_type(&TypeKey::of::<T>())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.store.contains_name(name)
    }

    /// Snapshot of every descriptor in registration order.
    pub fn descriptors(&self) -> Vec<DescriptorInfo> {
        self.store.iter().map(|descriptor| descriptor.info()).collect()
    }

    /// Resolves every unnamed Singleton that is not cached yet.
    ///
    /// Moves construction cost and configuration errors to startup. Returns
    /// the number of instances built; a factory producing no instance does
    /// not count.
    ///
    /// ```
    /// use ioc_registry::{Registry, RegistrationMode};
    ///
    /// let mut registry = Registry::new();
    /// registry
    ///     .register_singleton::<String>(RegistrationMode::Safe).unwrap()
    ///     .register_value(3u8, RegistrationMode::Safe).unwrap()
    ///     .register_transient::<u64>(RegistrationMode::Safe).unwrap();
    ///
    /// assert_eq!(registry.prewarm_singletons().unwrap(), 1);
    /// assert_eq!(registry.prewarm_singletons().unwrap(), 0);
    /// ```
    pub fn prewarm_singletons(&self) -> DiResult<usize> {
        let mut built = 0;
        for descriptor in self.store.iter() {
            if descriptor.lifetime != Lifetime::Singleton
                || descriptor.name.is_some()
                || descriptor.is_cached()
            {
                continue;
            }
            let instance = self.observers.observe(
                || descriptor.key(),
                || self.resolve_descriptor(descriptor),
            )?;
            if instance.is_some() {
                built += 1;
            }
        }
        tracing::debug!(built, "prewarmed singletons");
        Ok(built)
    }

    /// Lifetime rules for one descriptor of this registry.
    ///
    /// Scoped items need a forked registry. Named items hand out the
    /// instance stored at registration. Unnamed Singleton and Scoped items
    /// are built on the first lookup and cached; a nil build result is not
    /// cached, so it is attempted again next time. Transient items are
    /// built on every lookup.
    pub(crate) fn resolve_descriptor(&self, descriptor: &ItemDescriptor) -> DiResult<Option<AnyArc>> {
        if descriptor.lifetime == Lifetime::Scoped && !self.scoped {
            return Err(DiError::ScopeRequired(descriptor.key()));
        }

        if !descriptor.lifetime.is_cached() {
            return self.build(descriptor);
        }

        if descriptor.name.is_some() {
            return Ok(descriptor.instance.get().cloned());
        }

        if let Some(instance) = descriptor.instance.get() {
            tracing::trace!(item = %descriptor.item_type, "cache hit");
            return Ok(Some(Arc::clone(instance)));
        }

        // Racing builders may both run; the first stored value wins.
        let built = self.build(descriptor)?;
        Ok(built.map(|instance| Arc::clone(descriptor.instance.get_or_init(|| instance))))
    }

    /// Dumps the descriptor table.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Registry ({}, {} items, {} observers)",
            if self.scoped { "scope" } else { "root" },
            self.store.len(),
            self.observers.len(),
        );
        for descriptor in self.store.iter() {
            let _ = writeln!(
                out,
                "  {:<40} {:<9} factory={} cached={}",
                descriptor.key().to_string(),
                descriptor.lifetime.to_string(),
                descriptor.has_factory(),
                descriptor.is_cached(),
            );
        }
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("items", &self.store.len())
            .field("scoped", &self.scoped)
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ResolverCore for Registry {
    fn resolve_by_type(&self, item_type: &TypeKey) -> DiResult<Option<AnyArc>> {
        self.observers.observe(
            || Key::Type(*item_type),
            || {
                let descriptor = self.store.find_by_type(item_type)?;
                self.resolve_descriptor(descriptor)
            },
        )
    }

    fn resolve_by_name(&self, name: &str) -> DiResult<Option<AnyArc>> {
        self.observers.observe(
            || Key::Named(name.to_string()),
            || {
                let descriptor = self.store.find_by_name(name)?;
                self.resolve_descriptor(descriptor)
            },
        )
    }
}
