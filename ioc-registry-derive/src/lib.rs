//! Derive macro for ioc-registry field injection.
//!
//! This crate provides `#[derive(Injectable)]`, which implements
//! `ioc_registry::Injectable` from `#[inject]` field markers. Generated
//! code refers to `::ioc_registry`, so use it through the re-export in
//! that crate.

use proc_macro::TokenStream;

mod injectable;

/// Derive macro for types the registry can construct and wire.
///
/// Every named field marked `#[inject]` becomes an injection point. The
/// field must be an `Option<Arc<T>>`; the registry fills it with the item
/// registered for `T`, or with the item registered under an explicit name.
///
/// # Attribute forms
///
/// - `#[inject]` resolves by the field's target type
/// - `#[inject("cfg")]` resolves the item named `cfg`
/// - `#[inject(name = "cfg")]` same as above
///
/// An empty name resolves by type.
///
/// # Example
///
/// ```ignore
/// use ioc_registry::Injectable;
/// use std::sync::Arc;
///
/// #[derive(Default, Injectable)]
/// pub struct UserService {
///     #[inject]
///     repo: Option<Arc<UserRepository>>,
///     #[inject("settings")]
///     settings: Option<Arc<Settings>>,
///     cache_size: usize,  // left alone
/// }
///
/// // Generated implementation:
/// // impl ::ioc_registry::Injectable for UserService {
/// //     fn inject_fields() -> Vec<InjectFieldInfo> { /* repo, settings */ }
/// //     fn assign(&mut self, field: &str, value: AnyArc) -> DiResult<()> { ... }
/// // }
/// ```
///
/// Marking a field of any other type is accepted at compile time and
/// reported by the registry as an invalid injection target when the type
/// is built.
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}
