//! # Spawn Storm
//!
//! Drives a registry the way a shooter would:
//!
//! ```text
//! Frame N:
//! ┌────────────────────────────────────────────────────────────┐
//! │ 1. SPAWN   random bursts from every pool                   │
//! │ 2. ADVANCE move every live sprite one step                 │
//! │ 3. EXPIRE  return sprites whose lifetime ran out           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Traffic is seeded, so two storms with the same config do the same thing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use revenant_core::{EntityHandle, PoolName, PoolRegistry, PoolStats};
use revenant_shared::{Placement, Vec3};

use crate::sandbox::SpriteTemplate;

/// Storm parameters.
#[derive(Clone, Debug)]
pub struct StormConfig {
    /// Frames to simulate.
    pub frames: u32,
    /// RNG seed.
    pub seed: u64,
    /// Upper bound on spawn attempts per pool per frame.
    pub max_burst: u32,
    /// Shortest sprite lifetime, in frames.
    pub min_lifetime: u32,
    /// Longest sprite lifetime, in frames.
    pub max_lifetime: u32,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            frames: 600, // 10 seconds at 60 FPS
            seed: 0x5eed,
            max_burst: 6,
            min_lifetime: 10,
            max_lifetime: 90,
        }
    }
}

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Sprites handed out.
    pub spawned: u32,
    /// Spawn attempts refused by exhausted pools.
    pub refused: u32,
    /// Sprites returned.
    pub despawned: u32,
    /// Sprites alive at the end of the frame.
    pub live: u32,
}

/// Totals for a finished storm.
#[derive(Clone, Debug)]
pub struct StormReport {
    /// Frames simulated.
    pub frames: u64,
    /// Sprites handed out.
    pub spawned: u64,
    /// Spawn attempts refused.
    pub refused: u64,
    /// Sprites returned.
    pub despawned: u64,
    /// Most sprites alive at once.
    pub peak_live: u32,
    /// Final pool counters.
    pub pools: Vec<PoolStats>,
}

struct Live {
    handle: EntityHandle,
    frames_left: u32,
}

/// Seeded spawn/despawn traffic over one registry.
pub struct Storm {
    registry: PoolRegistry<SpriteTemplate>,
    pools: Vec<PoolName>,
    live: Vec<Live>,
    rng: ChaCha8Rng,
    config: StormConfig,
    frame: u64,
}

impl Storm {
    /// Prepares a storm over an initialized registry.
    #[must_use]
    pub fn new(registry: PoolRegistry<SpriteTemplate>, config: StormConfig) -> Self {
        let pools = registry.pool_names().cloned().collect();
        Self {
            registry,
            pools,
            live: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            frame: 0,
        }
    }

    /// The registry being driven.
    #[must_use]
    pub fn registry(&self) -> &PoolRegistry<SpriteTemplate> {
        &self.registry
    }

    /// Sprites currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Simulates one frame.
    pub fn tick(&mut self) -> FrameStats {
        let mut stats = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };

        // 1. SPAWN
        for index in 0..self.pools.len() {
            let burst = self.rng.gen_range(0..=self.config.max_burst);
            for _ in 0..burst {
                let origin = Vec3::new(
                    self.rng.gen_range(-50.0..50.0),
                    0.0,
                    self.rng.gen_range(-50.0..50.0),
                );
                match self.registry.acquire(self.pools[index].as_str(), Placement::at(origin)) {
                    Some(handle) => {
                        let frames_left = self
                            .rng
                            .gen_range(self.config.min_lifetime..=self.config.max_lifetime);
                        self.live.push(Live { handle, frames_left });
                        stats.spawned += 1;
                    }
                    None => stats.refused += 1,
                }
            }
        }

        // 2. ADVANCE + 3. EXPIRE
        let registry = &mut self.registry;
        self.live.retain_mut(|live| {
            if let Some(sprite) = registry.get_mut(&live.handle) {
                sprite.advance();
            }
            live.frames_left = live.frames_left.saturating_sub(1);
            if live.frames_left > 0 {
                return true;
            }
            if let Err(error) = live.handle.return_to_pool(registry) {
                tracing::warn!("despawn of {} failed: {error}", live.handle);
            }
            stats.despawned += 1;
            false
        });

        stats.live = u32::try_from(self.live.len()).unwrap_or(u32::MAX);
        self.frame += 1;
        tracing::debug!(
            "frame {}: +{} -{} refused {} live {}",
            stats.frame,
            stats.spawned,
            stats.despawned,
            stats.refused,
            stats.live
        );
        stats
    }

    /// Returns every live sprite to its pool.
    pub fn drain(&mut self) -> u32 {
        let mut despawned = 0;
        for live in self.live.drain(..) {
            if live.handle.return_to_pool(&mut self.registry).is_ok() {
                despawned += 1;
            }
        }
        despawned
    }

    /// Runs every configured frame, drains, and reports.
    #[must_use]
    pub fn run(mut self) -> StormReport {
        let mut report = StormReport {
            frames: 0,
            spawned: 0,
            refused: 0,
            despawned: 0,
            peak_live: 0,
            pools: Vec::new(),
        };

        for _ in 0..self.config.frames {
            let frame = self.tick();
            report.frames += 1;
            report.spawned += u64::from(frame.spawned);
            report.refused += u64::from(frame.refused);
            report.despawned += u64::from(frame.despawned);
            report.peak_live = report.peak_live.max(frame.live);
        }

        report.despawned += u64::from(self.drain());
        report.pools = self.registry.stats();
        report
    }
}
