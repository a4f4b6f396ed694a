//! # Entity Handles
//!
//! Every manufactured instance is wrapped in a [`PooledEntity`] record: which
//! pool owns it and whether it is idle (pooled) or active (in use). Callers
//! never hold the record. They hold an [`EntityHandle`] that points back at it.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::PoolResult;
use crate::host::EntityTemplate;

use super::PoolRegistry;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-wide identity of a manufactured instance. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name of a pool. Cheap to clone.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolName(Arc<str>);

impl PoolName {
    /// Creates a pool name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PoolName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PoolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PoolName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PoolName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq<str> for PoolName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Per-instance record owned by a pool for the instance's whole life.
///
/// `is_idle` is the single source of truth for whether the instance may be
/// handed out: it is `true` exactly while the record sits in its pool's idle
/// set.
#[derive(Debug)]
pub struct PooledEntity<I> {
    instance: I,
    pool: PoolName,
    id: InstanceId,
    idle: bool,
}

impl<I> PooledEntity<I> {
    /// Freshly manufactured, not yet idled.
    pub(crate) fn new(instance: I, pool: PoolName) -> Self {
        Self {
            instance,
            pool,
            id: InstanceId::next(),
            idle: false,
        }
    }

    /// Pool that manufactured this instance.
    #[inline]
    #[must_use]
    pub fn pool_name(&self) -> &PoolName {
        &self.pool
    }

    /// Identity of this instance.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// True while pooled, false while handed out.
    #[inline]
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.idle
    }

    #[inline]
    pub(crate) fn set_idle(&mut self, idle: bool) {
        self.idle = idle;
    }

    /// The engine object.
    #[inline]
    #[must_use]
    pub fn instance(&self) -> &I {
        &self.instance
    }

    /// The engine object, mutably.
    #[inline]
    pub fn instance_mut(&mut self) -> &mut I {
        &mut self.instance
    }
}

/// What a caller holds while using a pooled instance.
///
/// A handle names its pool, the slot the instance lives in and the instance's
/// id. It is only a ticket: the instance itself stays in the pool and is
/// reached through [`PoolRegistry::get`] / [`PoolRegistry::get_mut`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pool: PoolName,
    slot: u32,
    id: InstanceId,
}

impl EntityHandle {
    pub(crate) const fn new(pool: PoolName, slot: u32, id: InstanceId) -> Self {
        Self { pool, slot, id }
    }

    /// Pool this instance belongs to.
    #[inline]
    #[must_use]
    pub fn pool_name(&self) -> &PoolName {
        &self.pool
    }

    /// Identity of the instance.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    #[inline]
    pub(crate) const fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Idle flag of the instance, or `None` if the registry does not know it.
    #[must_use]
    pub fn is_idle<T: EntityTemplate>(&self, registry: &PoolRegistry<T>) -> Option<bool> {
        registry.is_idle(self)
    }

    /// Gives the instance back to its pool.
    ///
    /// Does nothing if the instance is already idle, so it is safe to call
    /// without checking first.
    ///
    /// # Errors
    ///
    /// Same as [`PoolRegistry::release`].
    pub fn return_to_pool<T: EntityTemplate>(&self, registry: &mut PoolRegistry<T>) -> PoolResult<()> {
        if self.is_idle(registry) == Some(true) {
            return Ok(());
        }
        registry.release(self)
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pool, self.id)
    }
}
