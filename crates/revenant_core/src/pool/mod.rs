//! # Entity Pools
//!
//! Named pools of reusable engine instances.
//!
//! ## Design Philosophy
//!
//! Instances are manufactured at startup (or on demand for growable pools)
//! and then recycled forever:
//! - Acquire pops an idle instance, places it and activates it
//! - Release deactivates it and pushes it back
//! - An instance only ever goes back to the pool that made it

mod handle;
mod registry;
mod store;

pub use handle::{EntityHandle, InstanceId, PoolName, PooledEntity};
pub use registry::PoolRegistry;
pub use store::{Pool, PoolStats};
