//! # Pool
//!
//! Manufactures, hands out and re-absorbs instances for exactly one name.
//!
//! Instances live in a slot array for their whole life. The idle set is a
//! stack of slot indices: acquiring pops, releasing pushes. Reuse order is
//! not part of the contract.

use std::fmt;

use revenant_shared::Placement;

use crate::config::PoolDescriptor;
use crate::host::{EntityTemplate, PooledInstance};
use crate::log::PoolLogger;

use super::handle::{EntityHandle, PoolName, PooledEntity};

/// Point-in-time counters for one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Pool name.
    pub name: PoolName,
    /// Instances the pool currently owns (idle + active).
    pub logical_size: u32,
    /// Instances waiting in the pool.
    pub idle: u32,
    /// Instances handed out.
    pub active: u32,
    /// Instances manufactured after initialization.
    pub grown: u32,
    /// Idle instances dropped by the idle cap.
    pub evicted: u32,
    /// Size policy.
    pub fixed_size: bool,
}

/// A named pool of reusable instances sharing one template.
///
/// # Thread Safety
///
/// A pool is driven from one thread. Wrap the registry in a
/// [`SharedPoolRegistry`](crate::sync::SharedPoolRegistry) to share it.
pub struct Pool<T: EntityTemplate> {
    name: PoolName,
    template: T,
    fixed_size: bool,
    max_idle: Option<u32>,
    /// Every instance this pool owns. `None` for slots freed by eviction.
    slots: Vec<Option<PooledEntity<T::Instance>>>,
    /// Slot indices of idle instances.
    idle: Vec<u32>,
    /// Slot indices free for reuse by growth.
    vacant: Vec<u32>,
    logical_size: u32,
    grown: u32,
    evicted: u32,
    logger: PoolLogger,
}

impl<T: EntityTemplate> Pool<T> {
    /// Builds the pool and manufactures `initial_size` idle instances.
    pub(crate) fn new(descriptor: PoolDescriptor<T>, logger: PoolLogger) -> Self {
        let capacity = descriptor.initial_size as usize;
        let mut pool = Self {
            name: PoolName::from(descriptor.name),
            template: descriptor.template,
            fixed_size: descriptor.fixed_size,
            max_idle: descriptor.max_idle,
            slots: Vec::with_capacity(capacity),
            idle: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            logical_size: descriptor.initial_size,
            grown: 0,
            evicted: 0,
            logger,
        };

        for _ in 0..descriptor.initial_size {
            let slot = pool.manufacture();
            pool.make_idle(slot);
        }

        pool
    }

    /// Pool name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &PoolName {
        &self.name
    }

    /// True if the pool never grows.
    #[inline]
    #[must_use]
    pub const fn is_fixed_size(&self) -> bool {
        self.fixed_size
    }

    /// Idle cap, if any.
    #[inline]
    #[must_use]
    pub const fn max_idle(&self) -> Option<u32> {
        self.max_idle
    }

    /// Instances the pool currently owns.
    #[inline]
    #[must_use]
    pub const fn logical_size(&self) -> u32 {
        self.logical_size
    }

    /// Instances waiting to be handed out.
    #[inline]
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Instances currently handed out.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.logical_size as usize - self.idle.len()
    }

    /// The template new instances come from.
    #[inline]
    #[must_use]
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let idle = u32::try_from(self.idle.len()).unwrap_or(u32::MAX);
        PoolStats {
            name: self.name.clone(),
            logical_size: self.logical_size,
            idle,
            active: self.logical_size.saturating_sub(idle),
            grown: self.grown,
            evicted: self.evicted,
            fixed_size: self.fixed_size,
        }
    }

    /// The record behind `handle`, if it still lives in this pool.
    #[must_use]
    pub fn entity(&self, handle: &EntityHandle) -> Option<&PooledEntity<T::Instance>> {
        self.slots
            .get(handle.slot())?
            .as_ref()
            .filter(|entity| entity.id() == handle.id())
    }

    /// The instance behind `handle`.
    #[must_use]
    pub fn get(&self, handle: &EntityHandle) -> Option<&T::Instance> {
        self.entity(handle).map(PooledEntity::instance)
    }

    /// The instance behind `handle`, mutably.
    pub fn get_mut(&mut self, handle: &EntityHandle) -> Option<&mut T::Instance> {
        self.slots
            .get_mut(handle.slot())?
            .as_mut()
            .filter(|entity| entity.id() == handle.id())
            .map(PooledEntity::instance_mut)
    }

    /// Iterates over the instances currently handed out.
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &T::Instance)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entity)| entity.as_ref().map(|entity| (slot, entity)))
            .filter(|(_, entity)| !entity.is_idle())
            .map(move |(slot, entity)| (self.handle_for(slot, entity), entity.instance()))
    }

    /// Hands out an idle instance, growing the pool if allowed.
    ///
    /// Returns `None` if the pool is fixed-size and nothing is idle.
    pub(crate) fn next_available(&mut self, placement: Placement) -> Option<EntityHandle> {
        let slot = if let Some(slot) = self.idle.pop() {
            slot as usize
        } else if !self.fixed_size {
            self.logical_size += 1;
            self.grown += 1;
            self.logger.info(format_args!(
                "growing pool {}: new size {}",
                self.name, self.logical_size
            ));
            self.manufacture()
        } else {
            self.logger.warn(format_args!(
                "no instance available and cannot grow pool {}",
                self.name
            ));
            return None;
        };

        let entity = self.slots.get_mut(slot)?.as_mut()?;
        entity.set_idle(false);
        entity.instance_mut().set_placement(placement);
        entity.instance_mut().set_active(true);

        let handle = EntityHandle::new(self.name.clone(), slot_index(slot), entity.id());
        Some(handle)
    }

    /// Takes an instance back.
    ///
    /// Unconditional: the registry has already checked that the handle is
    /// ours and active.
    pub(crate) fn reabsorb(&mut self, handle: &EntityHandle) {
        self.make_idle(handle.slot());

        if let Some(cap) = self.max_idle {
            while self.idle.len() > cap as usize {
                self.evict_one();
            }
        }
    }

    /// Stamps a fresh instance with our name and stores it.
    fn manufacture(&mut self) -> usize {
        let entity = PooledEntity::new(self.template.manufacture(), self.name.clone());

        if let Some(slot) = self.vacant.pop() {
            let slot = slot as usize;
            self.slots[slot] = Some(entity);
            slot
        } else {
            self.slots.push(Some(entity));
            self.slots.len() - 1
        }
    }

    fn make_idle(&mut self, slot: usize) {
        if let Some(entity) = self.slots.get_mut(slot).and_then(Option::as_mut) {
            entity.set_idle(true);
            entity.instance_mut().set_active(false);
            self.idle.push(slot_index(slot));
        }
    }

    fn evict_one(&mut self) {
        let Some(slot) = self.idle.pop() else {
            return;
        };
        if let Some(entity) = self.slots[slot as usize].take() {
            self.vacant.push(slot);
            self.logical_size -= 1;
            self.evicted += 1;
            self.logger.info(format_args!(
                "evicting {} from pool {}: new size {}",
                entity.id(),
                self.name,
                self.logical_size
            ));
        }
    }

    fn handle_for(&self, slot: usize, entity: &PooledEntity<T::Instance>) -> EntityHandle {
        EntityHandle::new(self.name.clone(), slot_index(slot), entity.id())
    }
}

impl<T: EntityTemplate> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("fixed_size", &self.fixed_size)
            .field("max_idle", &self.max_idle)
            .field("logical_size", &self.logical_size)
            .field("idle", &self.idle.len())
            .finish_non_exhaustive()
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn slot_index(slot: usize) -> u32 {
    // Pool sizes are configured as u32, so slots never exceed u32::MAX.
    slot as u32
}
