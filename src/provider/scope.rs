//! Scope forking.

use std::sync::Arc;

use crate::error::{DiError, DiResult};

use super::Registry;

impl Registry {
    /// Creates a scope for one unit of work.
    ///
    /// The scope shares every Singleton descriptor with `self`, cache slot
    /// included, so a Singleton built anywhere in the tree is the instance
    /// the whole tree sees. Scoped and Transient descriptors are copied with
    /// empty cache slots: each scope builds its own Scoped instances.
    /// Observers and configuration are inherited.
    ///
    /// The root is shared through its `Arc`, so it cannot be registered on
    /// while scopes are alive; [`Arc::get_mut`] hands it back once they are
    /// dropped. Only a root registry can be forked; forking a scope fails
    /// with [`DiError::AlreadyScoped`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ioc_registry::{DiError, Registry, RegistrationMode, Resolver};
    /// use std::sync::Arc;
    ///
    /// let mut registry = Registry::new();
    /// registry.register_scoped::<String>(RegistrationMode::Safe).unwrap();
    /// let registry = Arc::new(registry);
    ///
    /// // Scoped items need a scope
    /// assert!(matches!(registry.get::<String>(), Err(DiError::ScopeRequired(_))));
    ///
    /// let scope = registry.fork().unwrap();
    /// let a = scope.get::<String>().unwrap();
    /// let b = scope.get::<String>().unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert!(std::ptr::eq(scope.master().unwrap(), &*registry));
    ///
    /// let scope = Arc::new(scope);
    /// assert!(matches!(scope.fork(), Err(DiError::AlreadyScoped)));
    /// ```
    pub fn fork(self: &Arc<Self>) -> DiResult<Registry> {
        if self.scoped {
            return Err(DiError::AlreadyScoped);
        }

        let scope = Registry {
            store: self.store.fork_copy(),
            scoped: true,
            master: Some(Arc::clone(self)),
            observers: self.observers.clone(),
            config: self.config.clone(),
        };
        tracing::debug!(items = scope.store.len(), "forked scope");

        Ok(scope)
    }

    /// The registry this scope was forked from, `None` for a root.
    pub fn master(&self) -> Option<&Registry> {
        self.master.as_deref()
    }
}
