//! # Revenant
//!
//! Demo host for the pool core.
//!
//! ## Modules
//!
//! - `sandbox`: toy sprites and the template catalog the manifest refers to
//! - `storm`: frame-by-frame spawn/despawn traffic over a registry

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod sandbox;
pub mod storm;

// Re-export the building blocks
pub use revenant_core as core;
pub use revenant_shared as shared;

pub use sandbox::{catalog, Sprite, SpriteKind, SpriteTemplate, DEFAULT_MANIFEST};
pub use storm::{FrameStats, Storm, StormConfig, StormReport};
