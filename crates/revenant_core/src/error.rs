//! # Pool Error Types
//!
//! Nothing in the pooling subsystem is fatal. Every error below is logged at
//! the point it is detected and then handed back to the caller as a value.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::pool::{InstanceId, PoolName};

/// A problem with one pool descriptor, found while building the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A descriptor has an empty (or whitespace-only) name.
    #[error("pool descriptor {index} does not have a name")]
    EmptyName {
        /// Position of the descriptor in the configured list.
        index: usize,
    },

    /// Two descriptors share a name. The first one is kept.
    #[error("pool descriptors {first} and {duplicate} are both named {name:?}")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// Position of the descriptor that was kept.
        first: usize,
        /// Position of the descriptor that was rejected.
        duplicate: usize,
    },

    /// A fixed-size pool was given an idle cap, which would leak capacity.
    #[error("pool {name:?} is fixed-size and cannot evict idle instances")]
    ShrinkOnFixedPool {
        /// The offending pool.
        name: String,
    },

    /// A manifest entry names a template the catalog does not know.
    #[error("pool {pool:?} refers to unknown template {template:?}")]
    UnknownTemplate {
        /// The pool entry.
        pool: String,
        /// The unresolved template key.
        template: String,
    },

    /// `initialize` was called on a registry that already has its pools.
    #[error("pool registry is already initialized")]
    AlreadyInitialized,

    /// The manifest file could not be read.
    #[error("cannot read pool manifest {path}: {reason}")]
    Unreadable {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        reason: String,
    },

    /// The manifest text is not valid.
    #[error("invalid pool manifest: {0}")]
    Manifest(String),
}

/// Every configuration problem found in one pass over a descriptor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// Wraps a non-empty list of errors.
    #[must_use]
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self(errors)
    }

    /// The individual errors, in descriptor order.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    /// Consumes the batch, returning the inner list.
    #[must_use]
    pub fn into_inner(self) -> Vec<ConfigError> {
        self.0
    }

    /// `Ok(())` for an empty batch, `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the batch itself when it holds at least one error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pool configuration error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl<'a> IntoIterator for &'a ConfigErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Why an acquire or release did not happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No pool is registered under this name.
    #[error("no pool named {0}")]
    UnknownPool(PoolName),

    /// The pool is fixed-size and every instance is in use.
    #[error("pool {0} is exhausted and cannot grow")]
    Exhausted(PoolName),

    /// A handle was routed to a pool other than the one that manufactured it.
    #[error("instance {id} belongs to pool {owner}, not {pool}")]
    ForeignHandle {
        /// Pool stamped on the handle.
        owner: PoolName,
        /// Pool the release was routed to.
        pool: PoolName,
        /// The instance.
        id: InstanceId,
    },
}

impl PoolError {
    /// Unknown pool name at acquire or release time.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::UnknownPool(_))
    }

    /// Fixed-size pool with nothing idle.
    #[must_use]
    pub const fn is_exhaustion(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Caller misuse: a handle sent to the wrong pool.
    #[must_use]
    pub const fn is_misuse(&self) -> bool {
        matches!(self, Self::ForeignHandle { .. })
    }
}

/// Result type for acquire/release operations.
pub type PoolResult<T> = Result<T, PoolError>;
