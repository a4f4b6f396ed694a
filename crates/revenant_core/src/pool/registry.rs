//! # Pool Registry
//!
//! The catalog of named pools and the single entry point for acquire and
//! release. Every ownership and state check happens here, once, before a
//! pool is touched.
//!
//! ## Lifecycle
//!
//! ```text
//! PoolRegistry::new(logger) ──► initialize(descriptors) ──► acquire / release ...
//!                                  (exactly once)
//! ```
//!
//! The registry is an ordinary value. Whoever needs pooling gets it by
//! reference; there is no global instance.

use std::collections::HashMap;
use std::fmt;

use revenant_shared::Placement;

use crate::config::PoolDescriptor;
use crate::error::{ConfigError, ConfigErrors, PoolError, PoolResult};
use crate::host::EntityTemplate;
use crate::log::PoolLogger;

use super::handle::{EntityHandle, PoolName};
use super::store::{Pool, PoolStats};

/// Owns every pool and routes requests to them by name.
pub struct PoolRegistry<T: EntityTemplate> {
    pools: HashMap<PoolName, Pool<T>>,
    /// Pool names in configuration order.
    order: Vec<PoolName>,
    logger: PoolLogger,
    initialized: bool,
}

impl<T: EntityTemplate> PoolRegistry<T> {
    /// Creates an empty registry. Call [`initialize`](Self::initialize) next.
    #[must_use]
    pub fn new(logger: PoolLogger) -> Self {
        Self {
            pools: HashMap::new(),
            order: Vec::new(),
            logger,
            initialized: false,
        }
    }

    /// Creates and initializes a registry, failing on any configuration error.
    ///
    /// # Errors
    ///
    /// Returns every problem found in `descriptors`.
    pub fn with_pools<D>(logger: PoolLogger, descriptors: D) -> Result<Self, ConfigErrors>
    where
        D: IntoIterator<Item = PoolDescriptor<T>>,
    {
        let mut registry = Self::new(logger);
        registry.initialize(descriptors)?;
        Ok(registry)
    }

    /// Validates the descriptors and builds one pool per valid descriptor.
    ///
    /// Empty names, duplicate names and idle caps on fixed-size pools are all
    /// reported in one pass. Offending descriptors are skipped; the rest are
    /// still built. For a duplicate name the first descriptor wins.
    ///
    /// # Errors
    ///
    /// Returns every configuration problem found, or
    /// [`ConfigError::AlreadyInitialized`] on a second call.
    pub fn initialize<D>(&mut self, descriptors: D) -> Result<(), ConfigErrors>
    where
        D: IntoIterator<Item = PoolDescriptor<T>>,
    {
        if self.initialized {
            let error = ConfigError::AlreadyInitialized;
            self.logger.error(format_args!("{error}"));
            return Err(error.into());
        }
        self.initialized = true;

        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut errors = Vec::new();

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            if let Err(error) = Self::validate(index, &descriptor, &first_seen) {
                self.logger.error(format_args!("{error}"));
                errors.push(error);
                continue;
            }
            first_seen.insert(descriptor.name.clone(), index);

            self.logger.info(format_args!(
                "creating pool {} ({} {}, {})",
                descriptor.name,
                descriptor.initial_size,
                if descriptor.initial_size == 1 { "instance" } else { "instances" },
                if descriptor.fixed_size { "fixed" } else { "growable" },
            ));

            let pool = Pool::new(descriptor, self.logger.clone());
            let name = pool.name().clone();
            self.order.push(name.clone());
            self.pools.insert(name, pool);
        }

        ConfigErrors::new(errors).into_result()
    }

    fn validate(
        index: usize,
        descriptor: &PoolDescriptor<T>,
        first_seen: &HashMap<String, usize>,
    ) -> Result<(), ConfigError> {
        if descriptor.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        if let Some(&first) = first_seen.get(&descriptor.name) {
            return Err(ConfigError::DuplicateName {
                name: descriptor.name.clone(),
                first,
                duplicate: index,
            });
        }
        if descriptor.fixed_size && descriptor.max_idle.is_some() {
            return Err(ConfigError::ShrinkOnFixedPool {
                name: descriptor.name.clone(),
            });
        }
        Ok(())
    }

    /// True once [`initialize`](Self::initialize) has run.
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The shared logger.
    #[inline]
    #[must_use]
    pub fn logger(&self) -> &PoolLogger {
        &self.logger
    }

    /// Hands out an instance of `pool_name` placed at `placement`.
    ///
    /// Unknown names and exhausted fixed-size pools are logged and yield
    /// `None`.
    pub fn acquire(&mut self, pool_name: &str, placement: Placement) -> Option<EntityHandle> {
        self.try_acquire(pool_name, placement).ok()
    }

    /// [`acquire`](Self::acquire) at the origin with no rotation.
    pub fn acquire_at_origin(&mut self, pool_name: &str) -> Option<EntityHandle> {
        self.acquire(pool_name, Placement::IDENTITY)
    }

    /// Like [`acquire`](Self::acquire), but says why nothing was handed out.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPool`] or [`PoolError::Exhausted`]. Both are also
    /// logged.
    pub fn try_acquire(&mut self, pool_name: &str, placement: Placement) -> PoolResult<EntityHandle> {
        let Some(pool) = self.pools.get_mut(pool_name) else {
            self.logger
                .error(format_args!("invalid pool name specified: {pool_name}"));
            return Err(PoolError::UnknownPool(PoolName::from(pool_name)));
        };

        match pool.next_available(placement) {
            Some(handle) => Ok(handle),
            None => {
                self.logger.warn(format_args!(
                    "no instance available in pool {pool_name}; consider making it growable"
                ));
                Err(PoolError::Exhausted(pool.name().clone()))
            }
        }
    }

    /// Gives an instance back to the pool named on its handle.
    ///
    /// Releasing an instance that is already idle is a logged no-op, so
    /// double releases never corrupt a pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPool`] if no pool carries the handle's name.
    pub fn release(&mut self, handle: &EntityHandle) -> PoolResult<()> {
        self.release_into(handle.pool_name().as_str(), handle)
    }

    /// Gives an instance back to the pool named `pool_name`.
    ///
    /// The handle must have come from that pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPool`] if no such pool exists, and
    /// [`PoolError::ForeignHandle`] if the handle belongs to another pool.
    /// Neither changes any pool.
    pub fn release_into(&mut self, pool_name: &str, handle: &EntityHandle) -> PoolResult<()> {
        let Some(pool) = self.pools.get_mut(pool_name) else {
            self.logger
                .warn(format_args!("no pool available with name {pool_name}"));
            return Err(PoolError::UnknownPool(PoolName::from(pool_name)));
        };

        if pool.name() != handle.pool_name() {
            self.logger.error(format_args!(
                "trying to return {} to incorrect pool {}",
                handle,
                pool.name()
            ));
            return Err(PoolError::ForeignHandle {
                owner: handle.pool_name().clone(),
                pool: pool.name().clone(),
                id: handle.id(),
            });
        }

        match pool.entity(handle) {
            None => {
                self.logger.warn(format_args!(
                    "{handle} is no longer owned by pool {pool_name}; it was already returned"
                ));
            }
            Some(entity) if entity.is_idle() => {
                self.logger.warn(format_args!(
                    "{handle} is already in pool {pool_name}; why return it again? Check usage"
                ));
            }
            Some(_) => pool.reabsorb(handle),
        }
        Ok(())
    }

    /// Idle flag of the instance behind `handle`, if it still exists.
    #[must_use]
    pub fn is_idle(&self, handle: &EntityHandle) -> Option<bool> {
        self.pools
            .get(handle.pool_name().as_str())?
            .entity(handle)
            .map(|entity| entity.is_idle())
    }

    /// The instance behind `handle`.
    #[must_use]
    pub fn get(&self, handle: &EntityHandle) -> Option<&T::Instance> {
        self.pools.get(handle.pool_name().as_str())?.get(handle)
    }

    /// The instance behind `handle`, mutably.
    pub fn get_mut(&mut self, handle: &EntityHandle) -> Option<&mut T::Instance> {
        self.pools.get_mut(handle.pool_name().as_str())?.get_mut(handle)
    }

    /// The pool registered under `name`.
    #[must_use]
    pub fn pool(&self, name: &str) -> Option<&Pool<T>> {
        self.pools.get(name)
    }

    /// Pool names in configuration order.
    pub fn pool_names(&self) -> impl Iterator<Item = &PoolName> + '_ {
        self.order.iter()
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// True if no pools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Counters for every pool, in configuration order.
    #[must_use]
    pub fn stats(&self) -> Vec<PoolStats> {
        self.order
            .iter()
            .filter_map(|name| self.pools.get(name))
            .map(Pool::stats)
            .collect()
    }
}

impl<T: EntityTemplate> fmt::Debug for PoolRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.order)
            .field("logger", &self.logger)
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, RecordingSink, Severity};
    use crate::test_support::DummyTemplate;
    use revenant_shared::Vec3;

    fn registry(
        descriptors: Vec<PoolDescriptor<DummyTemplate>>,
    ) -> (PoolRegistry<DummyTemplate>, RecordingSink) {
        let sink = RecordingSink::new();
        let mut registry = PoolRegistry::new(PoolLogger::with_sink(LogLevel::All, sink.clone()));
        registry.initialize(descriptors).unwrap();
        (registry, sink)
    }

    #[test]
    fn test_initialize_builds_pools_in_order() {
        let (registry, sink) = registry(vec![
            PoolDescriptor::fixed("bullet", DummyTemplate::new("bullet"), 3),
            PoolDescriptor::growable("spark", DummyTemplate::new("spark"), 1),
        ]);

        let names: Vec<_> = registry.pool_names().map(PoolName::as_str).collect();
        assert_eq!(names, ["bullet", "spark"]);
        assert_eq!(registry.pool("bullet").unwrap().idle_count(), 3);
        assert!(sink.contains(Severity::Info, "creating pool bullet (3 instances, fixed)"));
        assert!(sink.contains(Severity::Info, "creating pool spark (1 instance, growable)"));
    }

    #[test]
    fn test_initialize_reports_all_problems_and_keeps_valid_pools() {
        let sink = RecordingSink::new();
        let mut registry = PoolRegistry::new(PoolLogger::with_sink(LogLevel::WarningsAndErrors, sink.clone()));

        let errors = registry
            .initialize(vec![
                PoolDescriptor::fixed("", DummyTemplate::new("nameless"), 1),
                PoolDescriptor::fixed("enemy", DummyTemplate::new("grunt"), 2),
                PoolDescriptor::fixed("enemy", DummyTemplate::new("brute"), 5),
                PoolDescriptor::fixed("boss", DummyTemplate::new("boss"), 1).with_max_idle(1),
                PoolDescriptor::growable("spark", DummyTemplate::new("spark"), 0),
            ])
            .unwrap_err();

        assert_eq!(
            errors.errors(),
            [
                ConfigError::EmptyName { index: 0 },
                ConfigError::DuplicateName {
                    name: "enemy".to_string(),
                    first: 1,
                    duplicate: 2,
                },
                ConfigError::ShrinkOnFixedPool {
                    name: "boss".to_string(),
                },
            ]
        );
        assert_eq!(sink.count(Severity::Error), 3);

        assert_eq!(registry.len(), 2);
        let enemy = registry.pool("enemy").unwrap();
        assert_eq!(enemy.logical_size(), 2);
        assert_eq!(enemy.template().manufactured(), 2);
        assert!(registry.pool("boss").is_none());
        assert!(registry.pool("spark").is_some());
    }

    #[test]
    fn test_second_initialize_is_rejected() {
        let (mut registry, _) = registry(vec![PoolDescriptor::fixed(
            "bullet",
            DummyTemplate::new("bullet"),
            1,
        )]);

        let errors = registry
            .initialize(vec![PoolDescriptor::fixed("rocket", DummyTemplate::new("rocket"), 1)])
            .unwrap_err();

        assert_eq!(errors.errors(), [ConfigError::AlreadyInitialized]);
        assert!(registry.pool("rocket").is_none());
    }

    #[test]
    fn test_acquire_unknown_pool() {
        let (mut registry, sink) = registry(Vec::new());

        let err = registry.try_acquire("ghost", Placement::IDENTITY).unwrap_err();
        assert_eq!(err, PoolError::UnknownPool(PoolName::from("ghost")));
        assert!(sink.contains(Severity::Error, "invalid pool name specified: ghost"));
        assert!(registry.acquire_at_origin("ghost").is_none());
    }

    #[test]
    fn test_acquire_exhausted_suggests_growable() {
        let (mut registry, sink) = registry(vec![PoolDescriptor::fixed(
            "bullet",
            DummyTemplate::new("bullet"),
            1,
        )]);

        assert!(registry.acquire_at_origin("bullet").is_some());
        let err = registry.try_acquire("bullet", Placement::IDENTITY).unwrap_err();

        assert!(err.is_exhaustion());
        assert!(sink.contains(Severity::Warning, "consider making it growable"));
    }

    #[test]
    fn test_acquire_places_instance() {
        let (mut registry, _) = registry(vec![PoolDescriptor::growable(
            "spark",
            DummyTemplate::new("spark"),
            0,
        )]);
        let placement = Placement::at(Vec3::new(0.0, 4.0, 0.0));

        let handle = registry.acquire("spark", placement).unwrap();

        assert_eq!(handle.is_idle(&registry), Some(false));
        let spark = registry.get(&handle).unwrap();
        assert!(spark.active);
        assert_eq!(spark.placement, placement);

        registry.get_mut(&handle).unwrap().kind = "spark_big";
        assert_eq!(registry.get(&handle).unwrap().kind, "spark_big");
    }

    #[test]
    fn test_release_reidles_and_hides() {
        let (mut registry, _) = registry(vec![PoolDescriptor::fixed(
            "bullet",
            DummyTemplate::new("bullet"),
            2,
        )]);

        let handle = registry.acquire_at_origin("bullet").unwrap();
        registry.release(&handle).unwrap();

        assert_eq!(registry.is_idle(&handle), Some(true));
        assert!(!registry.get(&handle).unwrap().active);
        assert_eq!(registry.pool("bullet").unwrap().idle_count(), 2);
    }

    #[test]
    fn test_double_release_is_logged_noop() {
        let (mut registry, sink) = registry(vec![PoolDescriptor::fixed(
            "bullet",
            DummyTemplate::new("bullet"),
            2,
        )]);

        let handle = registry.acquire_at_origin("bullet").unwrap();
        registry.release(&handle).unwrap();
        let after_first = registry.pool("bullet").unwrap().stats();

        registry.release(&handle).unwrap();

        assert_eq!(registry.pool("bullet").unwrap().stats(), after_first);
        assert!(sink.contains(Severity::Warning, "already in pool bullet"));
    }

    #[test]
    fn test_release_into_wrong_pool_is_rejected() {
        let (mut registry, sink) = registry(vec![
            PoolDescriptor::fixed("bullet", DummyTemplate::new("bullet"), 1),
            PoolDescriptor::fixed("rocket", DummyTemplate::new("rocket"), 1),
        ]);

        let bullet = registry.acquire_at_origin("bullet").unwrap();
        let rocket = registry.acquire_at_origin("rocket").unwrap();
        let before = registry.pool("rocket").unwrap().stats();

        let err = registry.release_into("rocket", &bullet).unwrap_err();

        assert!(err.is_misuse());
        assert_eq!(registry.pool("rocket").unwrap().stats(), before);
        assert_eq!(registry.is_idle(&bullet), Some(false));
        assert_eq!(registry.is_idle(&rocket), Some(false));
        assert!(sink.contains(Severity::Error, "incorrect pool rocket"));
    }

    #[test]
    fn test_release_after_eviction_is_noop() {
        let (mut registry, sink) = registry(vec![
            PoolDescriptor::growable("spark", DummyTemplate::new("spark"), 0).with_max_idle(0),
        ]);

        let handle = registry.acquire_at_origin("spark").unwrap();
        registry.release(&handle).unwrap();
        assert_eq!(registry.is_idle(&handle), None);

        registry.release(&handle).unwrap();
        assert!(sink.contains(Severity::Warning, "no longer owned by pool spark"));
        assert_eq!(registry.pool("spark").unwrap().idle_count(), 0);
    }

    #[test]
    fn test_return_to_pool_skips_idle_handles() {
        let (mut registry, sink) = registry(vec![PoolDescriptor::fixed(
            "bullet",
            DummyTemplate::new("bullet"),
            1,
        )]);

        let handle = registry.acquire_at_origin("bullet").unwrap();
        handle.return_to_pool(&mut registry).unwrap();
        handle.return_to_pool(&mut registry).unwrap();

        assert_eq!(registry.pool("bullet").unwrap().idle_count(), 1);
        // The convenience checks first, so the registry never sees the second call.
        assert_eq!(sink.count(Severity::Warning), 0);
    }

    #[test]
    fn test_stats_in_order() {
        let (mut registry, _) = registry(vec![
            PoolDescriptor::growable("spark", DummyTemplate::new("spark"), 0),
            PoolDescriptor::fixed("bullet", DummyTemplate::new("bullet"), 2),
        ]);
        registry.acquire_at_origin("spark").unwrap();

        let stats = registry.stats();
        assert_eq!(stats[0].name, PoolName::from("spark"));
        assert_eq!((stats[0].logical_size, stats[0].active, stats[0].grown), (1, 1, 1));
        assert_eq!((stats[1].idle, stats[1].fixed_size), (2, true));
    }
}
