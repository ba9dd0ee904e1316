//! Instance builder: construction and recursive field injection.

use std::any::Any;
use std::sync::Arc;

use crate::descriptors::{Blueprint, ItemDescriptor};
use crate::error::{DiError, DiResult};
use crate::inject::{AnyArc, InjectFieldInfo};
use crate::internal::with_cycle_guard;
use crate::key::Key;

use super::Registry;

impl Registry {
    /// Produces a fresh instance of `descriptor`, fully wired.
    ///
    /// Runs the factory if there is one, otherwise zero-constructs the
    /// declared type, then fills every `#[inject]` field by resolving on
    /// `self`. The instance stays boxed until wiring succeeds, so a failed
    /// build drops it and nothing is cached.
    pub(crate) fn build(&self, descriptor: &ItemDescriptor) -> DiResult<Option<AnyArc>> {
        let key = descriptor.key();
        with_cycle_guard(&key, self.config.max_depth, || {
            tracing::debug!(item = %key, lifetime = %descriptor.lifetime, "building item");

            let mut instance = match &descriptor.factory {
                Some(factory) => match factory(self) {
                    Some(instance) => instance,
                    None => {
                        tracing::debug!(item = %key, "factory produced no instance");
                        return Ok(None);
                    }
                },
                None => {
                    let construct = descriptor
                        .blueprint
                        .and_then(|blueprint| blueprint.construct)
                        .ok_or_else(|| DiError::UnknownType(key.clone()))?;
                    construct()
                }
            };

            if let Some(blueprint) = &descriptor.blueprint {
                self.inject(blueprint, instance.as_mut())?;
            }

            Ok(Some(Arc::from(instance)))
        })
    }

    fn inject(&self, blueprint: &Blueprint, instance: &mut (dyn Any + Send + Sync)) -> DiResult<()> {
        for field in (blueprint.fields)() {
            if let Some(value) = self.resolve_field(&field)? {
                (blueprint.assign)(instance, field.field_name(), value)?;
            }
        }
        Ok(())
    }

    /// Resolves the dependency of one field, by name when the field carries
    /// one and by its target type otherwise.
    fn resolve_field(&self, field: &InjectFieldInfo) -> DiResult<Option<AnyArc>> {
        let Some(target) = field.target() else {
            return Err(DiError::InvalidInjectionTarget {
                field: field.field_name().to_string(),
                field_type: field.field_type(),
            });
        };

        let key = match field.item_name() {
            Some(name) => Key::Named(name.to_string()),
            None => Key::Type(target),
        };

        self.observers.observe(
            || key.clone(),
            || {
                let descriptor = match field.item_name() {
                    Some(name) => self.store.find_by_name(name)?,
                    None => self.store.find_by_type(&target)?,
                };
                if descriptor.item_type != target {
                    return Err(DiError::TypeMismatch {
                        field: field.field_name().to_string(),
                        target: key.to_string(),
                    });
                }
                self.resolve_descriptor(descriptor)
            },
        )
    }
}
