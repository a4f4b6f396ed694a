//! # Pool Configuration
//!
//! Pools are declared once at startup, either directly as a list of
//! [`PoolDescriptor`]s or through a TOML [`PoolManifest`]:
//!
//! ```toml
//! log_level = "warnings_and_errors"
//!
//! [[pool]]
//! name = "bullet"
//! template = "bullet"
//! initial_size = 64
//! fixed_size = true
//!
//! [[pool]]
//! name = "spark"
//! template = "spark_small"
//! initial_size = 16
//! max_idle = 48
//! ```
//!
//! Manifest templates are keys. The caller resolves them into real templates
//! with [`PoolManifest::resolve`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigErrors};
use crate::log::{LogLevel, PoolLogger};

/// Declaration of one pool. Immutable once handed to the registry.
#[derive(Clone, Debug)]
pub struct PoolDescriptor<T> {
    /// Unique, non-empty pool name.
    pub name: String,
    /// What new instances are manufactured from.
    pub template: T,
    /// Instances manufactured up front.
    pub initial_size: u32,
    /// Never manufacture beyond `initial_size`.
    pub fixed_size: bool,
    /// Growable pools only: evict idle instances above this count.
    /// `None` means the pool never shrinks.
    pub max_idle: Option<u32>,
}

impl<T> PoolDescriptor<T> {
    /// A pool that fails instead of growing once `capacity` instances are out.
    #[must_use]
    pub fn fixed(name: impl Into<String>, template: T, capacity: u32) -> Self {
        Self {
            name: name.into(),
            template,
            initial_size: capacity,
            fixed_size: true,
            max_idle: None,
        }
    }

    /// A pool that manufactures more instances whenever it runs dry.
    #[must_use]
    pub fn growable(name: impl Into<String>, template: T, initial_size: u32) -> Self {
        Self {
            name: name.into(),
            template,
            initial_size,
            fixed_size: false,
            max_idle: None,
        }
    }

    /// Caps how many idle instances the pool keeps after a burst.
    #[must_use]
    pub fn with_max_idle(mut self, max_idle: u32) -> Self {
        self.max_idle = Some(max_idle);
        self
    }
}

/// One `[[pool]]` table of a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolEntry {
    /// Pool name.
    pub name: String,
    /// Template key, resolved by the caller.
    pub template: String,
    /// Instances manufactured up front.
    #[serde(default)]
    pub initial_size: u32,
    /// Never grow beyond `initial_size`.
    #[serde(default)]
    pub fixed_size: bool,
    /// Idle cap for growable pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle: Option<u32>,
}

/// Startup pool manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolManifest {
    /// Diagnostic verbosity for the whole registry.
    #[serde(default)]
    pub log_level: LogLevel,
    /// Pools, in declaration order.
    #[serde(default, rename = "pool")]
    pub pools: Vec<PoolEntry>,
}

impl PoolManifest {
    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Manifest`] if the text is not a valid manifest.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Manifest(e.to_string()))
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unreadable`] if the file cannot be read and
    /// [`ConfigError::Manifest`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the manifest back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Manifest`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Manifest(e.to_string()))
    }

    /// A `tracing` logger at the manifest's level.
    #[must_use]
    pub fn logger(&self) -> PoolLogger {
        PoolLogger::new(self.log_level)
    }

    /// Turns every entry into a descriptor, looking templates up in `catalog`.
    ///
    /// All entries are resolved before returning, so every unknown template
    /// is reported at once.
    ///
    /// # Errors
    ///
    /// Returns one [`ConfigError::UnknownTemplate`] per unresolved entry.
    pub fn resolve<T, F>(&self, mut catalog: F) -> Result<Vec<PoolDescriptor<T>>, ConfigErrors>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let mut descriptors = Vec::with_capacity(self.pools.len());
        let mut errors = Vec::new();

        for entry in &self.pools {
            match catalog(&entry.template) {
                Some(template) => descriptors.push(PoolDescriptor {
                    name: entry.name.clone(),
                    template,
                    initial_size: entry.initial_size,
                    fixed_size: entry.fixed_size,
                    max_idle: entry.max_idle,
                }),
                None => errors.push(ConfigError::UnknownTemplate {
                    pool: entry.name.clone(),
                    template: entry.template.clone(),
                }),
            }
        }

        ConfigErrors::new(errors).into_result()?;
        Ok(descriptors)
    }
}
