//! # Cross-Thread Access
//!
//! [`PoolRegistry`](crate::PoolRegistry) is driven from one thread. Hosts that
//! spawn or despawn from several threads share it through
//! [`SharedPoolRegistry`].

mod shared_registry;

pub use shared_registry::SharedPoolRegistry;
