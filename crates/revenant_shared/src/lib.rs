//! # Revenant Shared
//!
//! Plain data types passed across the boundary between the pool core and the
//! engine that hosts pooled instances.
//!
//! ## Rule
//!
//! This crate must never depend on an engine, window or GPU crate. Hosts
//! convert these types into their own at the edge.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Placement, Quaternion, Transform, Vec3};
