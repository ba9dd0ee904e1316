//! Descriptor store.

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptors::ItemDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::{Key, TypeKey};
use crate::lifetime::Lifetime;

/// Registered descriptors of one registry.
///
/// Unnamed descriptors are keyed by type and named ones by name; both maps
/// point into `order`, which keeps registration order for introspection.
#[derive(Clone, Default)]
pub(crate) struct DescriptorStore {
    by_type: HashMap<TypeKey, Arc<ItemDescriptor>>,
    by_name: HashMap<String, Arc<ItemDescriptor>>,
    order: Vec<Arc<ItemDescriptor>>,
}

impl DescriptorStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, rejecting a second unnamed descriptor for a type
    /// or a second descriptor for a name.
    pub(crate) fn insert(&mut self, descriptor: ItemDescriptor) -> DiResult<Arc<ItemDescriptor>> {
        if descriptor.item_type.is_indirection() {
            return Err(DiError::InvalidRegistration {
                item: descriptor.item_type.name().to_string(),
                reason: "pointer, reference and smart-pointer types cannot be registered",
            });
        }

        let descriptor = Arc::new(descriptor);
        match &descriptor.name {
            Some(name) => {
                if self.by_name.contains_key(name) {
                    return Err(DiError::DuplicateKey(Key::Named(name.clone())));
                }
                self.by_name.insert(name.clone(), Arc::clone(&descriptor));
            }
            None => {
                if self.by_type.contains_key(&descriptor.item_type) {
                    return Err(DiError::DuplicateKey(Key::Type(descriptor.item_type)));
                }
                self.by_type.insert(descriptor.item_type, Arc::clone(&descriptor));
            }
        }
        self.order.push(Arc::clone(&descriptor));

        Ok(descriptor)
    }

    /// The unnamed descriptor for `item_type`.
    #[inline]
    pub(crate) fn find_by_type(&self, item_type: &TypeKey) -> DiResult<&Arc<ItemDescriptor>> {
        self.by_type
            .get(item_type)
            .ok_or(DiError::NotFound(Key::Type(*item_type)))
    }

    #[inline]
    pub(crate) fn find_by_name(&self, name: &str) -> DiResult<&Arc<ItemDescriptor>> {
        self.by_name
            .get(name)
            .ok_or_else(|| DiError::NotFound(Key::Named(name.to_string())))
    }

    pub(crate) fn contains_type(&self, item_type: &TypeKey) -> bool {
        self.by_type.contains_key(item_type)
    }

    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Descriptors in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<ItemDescriptor>> {
        self.order.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Descriptor set for a forked registry.
    ///
    /// Singleton descriptors are the same allocations as here; Scoped and
    /// Transient ones are fresh copies with empty cache slots.
    pub(crate) fn fork_copy(&self) -> Self {
        let mut forked = Self {
            by_type: HashMap::with_capacity(self.by_type.len()),
            by_name: HashMap::with_capacity(self.by_name.len()),
            order: Vec::with_capacity(self.order.len()),
        };

        for descriptor in &self.order {
            let descriptor = match descriptor.lifetime {
                Lifetime::Singleton => Arc::clone(descriptor),
                Lifetime::Scoped | Lifetime::Transient => Arc::new(descriptor.fresh_copy()),
            };
            match &descriptor.name {
                Some(name) => {
                    forked.by_name.insert(name.clone(), Arc::clone(&descriptor));
                }
                None => {
                    forked.by_type.insert(descriptor.item_type, Arc::clone(&descriptor));
                }
            }
            forked.order.push(descriptor);
        }

        forked
    }
}
