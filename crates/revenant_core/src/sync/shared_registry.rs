//! # Shared Pool Registry
//!
//! A [`PoolRegistry`] behind one `parking_lot` mutex.
//!
//! ## Thread Safety
//!
//! - Every call takes the lock exactly once and holds it only for the
//!   duration of that call
//! - Nothing inside the lock blocks or waits
//! - [`with_instance`](SharedPoolRegistry::with_instance) runs the closure
//!   under the lock, so keep it short

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use revenant_shared::Placement;

use crate::error::PoolResult;
use crate::host::EntityTemplate;
use crate::pool::{EntityHandle, PoolRegistry, PoolStats};

/// Clonable, thread-safe front for a [`PoolRegistry`].
pub struct SharedPoolRegistry<T: EntityTemplate> {
    inner: Arc<Mutex<PoolRegistry<T>>>,
}

impl<T: EntityTemplate> SharedPoolRegistry<T> {
    /// Takes ownership of an initialized registry.
    #[must_use]
    pub fn new(registry: PoolRegistry<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// See [`PoolRegistry::acquire`].
    pub fn acquire(&self, pool_name: &str, placement: Placement) -> Option<EntityHandle> {
        self.inner.lock().acquire(pool_name, placement)
    }

    /// See [`PoolRegistry::try_acquire`].
    ///
    /// # Errors
    ///
    /// Same as [`PoolRegistry::try_acquire`].
    pub fn try_acquire(&self, pool_name: &str, placement: Placement) -> PoolResult<EntityHandle> {
        self.inner.lock().try_acquire(pool_name, placement)
    }

    /// See [`PoolRegistry::release`].
    ///
    /// # Errors
    ///
    /// Same as [`PoolRegistry::release`].
    pub fn release(&self, handle: &EntityHandle) -> PoolResult<()> {
        self.inner.lock().release(handle)
    }

    /// See [`EntityHandle::return_to_pool`]. The idle check and the release
    /// happen under one lock.
    ///
    /// # Errors
    ///
    /// Same as [`PoolRegistry::release`].
    pub fn return_to_pool(&self, handle: &EntityHandle) -> PoolResult<()> {
        let mut registry = self.inner.lock();
        handle.return_to_pool(&mut *registry)
    }

    /// Runs `f` on the instance behind `handle`.
    pub fn with_instance<R>(
        &self,
        handle: &EntityHandle,
        f: impl FnOnce(&mut T::Instance) -> R,
    ) -> Option<R> {
        self.inner.lock().get_mut(handle).map(f)
    }

    /// See [`PoolRegistry::stats`].
    #[must_use]
    pub fn stats(&self) -> Vec<PoolStats> {
        self.inner.lock().stats()
    }

    /// Locks the registry for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, PoolRegistry<T>> {
        self.inner.lock()
    }
}

impl<T: EntityTemplate> Clone for SharedPoolRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: EntityTemplate> From<PoolRegistry<T>> for SharedPoolRegistry<T> {
    fn from(registry: PoolRegistry<T>) -> Self {
        Self::new(registry)
    }
}

impl<T: EntityTemplate> fmt::Debug for SharedPoolRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPoolRegistry").finish_non_exhaustive()
    }
}
