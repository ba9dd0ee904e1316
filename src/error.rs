//! Error types for the registry.

use thiserror::Error;

use crate::key::Key;

/// Registry errors
///
/// Represents every condition that can fail a registration, a resolution
/// or a fork. Resolution errors are always returned to the caller; only
/// registration can be told to panic instead (see
/// [`RegistrationMode`](crate::RegistrationMode)).
///
/// # Examples
///
/// ```rust
/// use ioc_registry::{DiError, Registry, Resolver};
///
/// struct Unregistered;
///
/// let registry = Registry::new();
/// match registry.resolve::<Unregistered>() {
///     Err(DiError::NotFound(key)) => assert!(key.to_string().contains("Unregistered")),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Registration collides with an existing type or name key
    #[error("Item already registered: {0}")]
    DuplicateKey(Key),
    /// Pointer-like type used as a key, or a required factory was missing
    #[error("Invalid registration of {item}: {reason}")]
    InvalidRegistration {
        item: String,
        reason: &'static str,
    },
    /// No descriptor for the requested type or name
    #[error("Item not found: {0}")]
    NotFound(Key),
    /// Scoped item resolved on a registry that was not forked
    #[error("Cannot resolve scoped item {0} outside a scope")]
    ScopeRequired(Key),
    /// Descriptor has neither a factory nor a constructible type
    #[error("Cannot create instance of {0}: unknown type")]
    UnknownType(Key),
    /// An `#[inject]` field is not an `Option<Arc<_>>`
    #[error("Injection field '{field}' has type {field_type}; only Option<Arc<_>> fields can be injected")]
    InvalidInjectionTarget {
        field: String,
        field_type: &'static str,
    },
    /// Resolved dependency's type differs from the field's target type
    #[error("Field '{field}' does not match the type of item {target}")]
    TypeMismatch { field: String, target: String },
    /// The registry being forked is already a scope
    #[error("Cannot create a scope from a scoped registry")]
    AlreadyScoped,
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Typed downcast at the call site failed
    #[error("Item {item} is not a {requested}")]
    WrongType {
        item: Key,
        requested: &'static str,
    },
    /// A non-optional accessor met an item whose factory produced nothing
    #[error("Item {0} resolved to no instance")]
    NilInstance(Key),
}

/// Result type for registry operations
pub type DiResult<T> = Result<T, DiError>;
