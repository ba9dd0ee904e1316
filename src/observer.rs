//! Diagnostic observers for resolution traceability.
//!
//! Observers receive an event before every lookup, after every successful
//! one and after every failed one, for top-level calls and for lookups made
//! while injecting fields alike. Calls are synchronous; keep
//! implementations lightweight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Observer trait for resolution events.
///
/// # Examples
///
/// ```
/// use ioc_registry::{DiError, DiObserver, Key, Registry, RegistrationMode, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     events: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.events.lock().unwrap().push(format!("resolving {key}"));
///     }
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.events.lock().unwrap().push(format!("resolved {key}"));
///     }
///
///     fn resolution_failed(&self, key: &Key, _error: &DiError) {
///         self.events.lock().unwrap().push(format!("failed {key}"));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut registry = Registry::new();
/// registry.add_observer(recorder.clone());
/// registry.register_value(7u8, RegistrationMode::Safe).unwrap();
///
/// registry.get::<u8>().unwrap();
/// let _ = registry.get::<u16>();
///
/// let events = recorder.events.lock().unwrap();
/// assert_eq!(events.as_slice(), [
///     "resolving type 'u8'",
///     "resolved type 'u8'",
///     "resolving type 'u16'",
///     "failed type 'u16'",
/// ]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when starting to resolve an item.
    fn resolving(&self, key: &Key);

    /// Called when an item is successfully resolved.
    ///
    /// # Arguments
    ///
    /// * `key` - The item key that was resolved
    /// * `duration` - Time elapsed from `resolving` to `resolved`
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a lookup fails. The error is still returned to the caller.
    fn resolution_failed(&self, key: &Key, error: &DiError);
}

/// Observer forwarding events to `tracing`.
///
/// Installed automatically when
/// [`RegistryConfig::log_resolutions`](crate::RegistryConfig) is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(key = %key, "resolving item");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(key = %key, elapsed_us = duration.as_micros() as u64, "resolved item");
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::debug!(key = %key, error = %error, "item resolution failed");
    }
}

/// Observers attached to a registry; shared with its forks.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Runs `lookup`, reporting it to every observer.
    #[inline]
    pub(crate) fn observe<T>(&self, key: impl FnOnce() -> Key, lookup: impl FnOnce() -> DiResult<T>) -> DiResult<T> {
        if self.observers.is_empty() {
            return lookup();
        }

        let key = key();
        for observer in &self.observers {
            observer.resolving(&key);
        }

        let start = Instant::now();
        let result = lookup();
        match &result {
            Ok(_) => {
                let elapsed = start.elapsed();
                for observer in &self.observers {
                    observer.resolved(&key, elapsed);
                }
            }
            Err(err) => {
                for observer in &self.observers {
                    observer.resolution_failed(&key, err);
                }
            }
        }

        result
    }
}
