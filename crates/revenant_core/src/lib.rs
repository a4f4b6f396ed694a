//! # Revenant Core
//!
//! Named pools of reusable engine entities for real-time games that spawn and
//! discard projectiles, effects and enemies every frame.
//!
//! ## Architecture Rules
//!
//! 1. **One entry point** - every acquire and release goes through [`PoolRegistry`]
//! 2. **Instances never leave their pool** - a handle can only go back where it came from
//! 3. **Misuse is not fatal** - double releases, unknown names and exhaustion are
//!    logged and reported as values, never as panics
//!
//! ## Example
//!
//! ```rust,ignore
//! use revenant_core::{PoolDescriptor, PoolLogger, PoolRegistry, LogLevel};
//!
//! let mut registry = PoolRegistry::new(PoolLogger::new(LogLevel::WarningsAndErrors));
//! registry.initialize([PoolDescriptor::fixed("bullet", bullet_template, 64)])?;
//!
//! if let Some(handle) = registry.acquire("bullet", muzzle) {
//!     // ... later, when the bullet hits something:
//!     handle.return_to_pool(&mut registry)?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod host;
pub mod log;
pub mod pool;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use config::{PoolDescriptor, PoolEntry, PoolManifest};
pub use error::{ConfigError, ConfigErrors, PoolError, PoolResult};
pub use host::{EntityTemplate, FnTemplate, PooledInstance};
pub use log::{LogLevel, LogRecord, LogSink, PoolLogger, RecordingSink, Severity, TracingSink};
pub use pool::{EntityHandle, InstanceId, Pool, PoolName, PoolRegistry, PoolStats, PooledEntity};
pub use revenant_shared::{Placement, Quaternion, Transform, Vec3};
pub use sync::SharedPoolRegistry;
