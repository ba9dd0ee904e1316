//! # ioc-registry
//!
//! Inversion-of-control registry with Singleton, Scoped and Transient
//! lifetimes, scope forking and derive-driven field injection.
//!
//! ## Features
//!
//! - **Three lifetimes**: one instance per registry tree, one per scope, or one per lookup
//! - **Field injection**: `#[derive(Injectable)]` wires `Option<Arc<T>>` fields by type or by name
//! - **Scope forking**: per-request registries sharing Singletons with the root
//! - **Thread-safe**: `Registry` is `Send + Sync`; Singletons are built once per tree
//! - **Circular dependency detection**: returned as an error with the full path
//!
//! ## Quick Start
//!
//! ```rust
//! use ioc_registry::{Injectable, Registry, RegistrationMode, Resolver};
//! use std::sync::Arc;
//!
//! #[derive(Default, Injectable)]
//! struct Database {
//!     connection_string: String,
//! }
//!
//! #[derive(Default, Injectable)]
//! struct UserService {
//!     #[inject]
//!     db: Option<Arc<Database>>,
//!     #[inject("app_name")]
//!     app_name: Option<Arc<String>>,
//! }
//!
//! let mut registry = Registry::new();
//! registry
//!     .register_value(Database { connection_string: "postgres://localhost".to_string() }, RegistrationMode::Safe)
//!     .unwrap()
//!     .register_by_name("app_name", "inventory".to_string(), RegistrationMode::Safe)
//!     .unwrap()
//!     .register_transient::<UserService>(RegistrationMode::Safe)
//!     .unwrap();
//!
//! let user_service = registry.get_required::<UserService>();
//! assert_eq!(user_service.db.as_ref().unwrap().connection_string, "postgres://localhost");
//! assert_eq!(user_service.app_name.as_deref().map(String::as_str), Some("inventory"));
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: Created once and shared by the root and every scope
//! - **Scoped**: Created once per forked registry; resolving it on a root is an error
//! - **Transient**: Created fresh on every resolution
//!
//! ## Scopes
//!
//! ```rust
//! use ioc_registry::{Lifetime, Registry, RegistrationMode, Resolver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct RequestId(usize);
//! impl ioc_registry::Injectable for RequestId {}
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let counter_clone = counter.clone();
//!
//! let mut registry = Registry::new();
//! registry.register_factory::<RequestId, _>(
//!     Lifetime::Scoped,
//!     move |_| Some(RequestId(counter_clone.fetch_add(1, Ordering::SeqCst))),
//!     RegistrationMode::Safe,
//! ).unwrap();
//!
//! let registry = Arc::new(registry);
//! let scope1 = registry.fork().unwrap();
//! let scope2 = registry.fork().unwrap();
//!
//! assert_eq!(scope1.get_required::<RequestId>().0, scope1.get_required::<RequestId>().0);
//! assert_ne!(scope1.get_required::<RequestId>().0, scope2.get_required::<RequestId>().0);
//! assert_eq!(counter.load(Ordering::SeqCst), 2);
//! ```

// Lets derive output (`::ioc_registry::...`) resolve inside this crate too
extern crate self as ioc_registry;

// Module declarations
pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;

#[cfg(feature = "axum-integration")]
pub mod axum_integration;

// Internal modules
mod internal;
mod registration;

// Re-exports
pub use collection::RegistrationMode;
pub use config::{ConfigError, RegistryConfig};
pub use descriptors::{BoxAny, DescriptorInfo, ItemDescriptor, ItemFactory};
pub use error::{DiError, DiResult};
pub use inject::{AnyArc, InjectFieldInfo, Injectable};
pub use ioc_registry_derive::Injectable;
pub use key::{key_of_type, Key, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::Registry;
pub use traits::{Resolver, ResolverCore};

#[cfg(feature = "axum-integration")]
pub use axum_integration::{RequestRegistry, ScopeLayer, ScopeService};
