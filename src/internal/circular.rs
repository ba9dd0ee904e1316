//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Thread-local stack of items currently being built
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<Key>,
}

/// Guard for managing thread-local resolution stack
///
/// Pushed before an item is built and popped when the build returns, so a
/// failed build unwinds the stack through `Drop` like a successful one.
pub(crate) struct StackGuard {
    key: Key,
}

impl StackGuard {
    /// Enters the build of `key`.
    ///
    /// Fails with [`DiError::Circular`] if `key` is already being built on
    /// this thread, or with [`DiError::DepthExceeded`] past `max_depth`.
    pub(crate) fn enter(key: &Key, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new key
            if tls.stack.contains(key) {
                let path = tls
                    .stack
                    .iter()
                    .chain(std::iter::once(key))
                    .map(describe)
                    .collect();
                return Err(DiError::Circular(path));
            }

            if tls.stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(tls.stack.len()));
            }

            tls.stack.push(key.clone());
            Ok(Self { key: key.clone() })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(last) = tls.stack.pop() {
                debug_assert_eq!(last, self.key);
            }
        });
    }
}

fn describe(key: &Key) -> String {
    match key {
        Key::Type(item_type) => item_type.name().to_string(),
        Key::Named(name) => name.clone(),
    }
}

/// Runs `build` with `key` pushed on the resolution stack.
pub(crate) fn with_cycle_guard<T, F>(key: &Key, max_depth: usize, build: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = StackGuard::enter(key, max_depth)?;
    build()
}
