//! Item lifetime definitions.

use std::fmt;

/// Item lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ioc_registry::{Injectable, Lifetime, Registry, RegistrationMode, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default, Injectable)]
/// struct Database;
/// #[derive(Default, Injectable)]
/// struct Repository;
/// #[derive(Default, Injectable)]
/// struct RequestModel;
///
/// let mut registry = Registry::new();
/// registry.register_type::<Database>(Lifetime::Singleton, RegistrationMode::Safe).unwrap();
/// registry.register_type::<Repository>(Lifetime::Scoped, RegistrationMode::Safe).unwrap();
/// registry.register_type::<RequestModel>(Lifetime::Transient, RegistrationMode::Safe).unwrap();
///
/// // Singleton: same instance in the root and in every scope
/// let registry = Arc::new(registry);
/// let db1 = registry.get::<Database>().unwrap();
/// let scope1 = registry.fork().unwrap();
/// let db2 = scope1.get::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Scoped: same within a scope, different across scopes
/// let repo1a = scope1.get::<Repository>().unwrap();
/// let repo1b = scope1.get::<Repository>().unwrap();
/// assert!(Arc::ptr_eq(&repo1a, &repo1b));
/// let scope2 = registry.fork().unwrap();
/// let repo2 = scope2.get::<Repository>().unwrap();
/// assert!(!Arc::ptr_eq(&repo1a, &repo2));
///
/// // Transient: always a fresh instance
/// let model1 = scope1.get::<RequestModel>().unwrap();
/// let model2 = scope1.get::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// Single instance per registry tree, cached forever
    ///
    /// The descriptor is shared by reference with every scope forked from
    /// the root, so the first build anywhere in the tree is the instance
    /// everyone sees.
    Singleton,
    /// Single instance per forked registry
    ///
    /// Only resolvable inside a scope. Each fork starts with an empty cache
    /// slot for every scoped item.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Whether instances of this lifetime are stored in the descriptor's cache slot.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        })
    }
}
