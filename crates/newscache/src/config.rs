//! Cache configuration
//!
//! Mirrors the owning service's `cache` properties:
//!
//! ```yaml
//! algorithm: LFU
//! max_size: 100
//! ```

use std::fs;
use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{CacheEngine, EvictionPolicy};
use crate::error::{Error, Result};
use crate::shared::SharedCache;

/// Default number of entries when `max_size` is omitted
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Construction-time cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Eviction policy, LRU unless stated otherwise
    pub algorithm: EvictionPolicy,
    /// Maximum number of cached entries
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            algorithm: EvictionPolicy::default(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl CacheConfig {
    /// Create a config for the given policy and capacity
    pub fn new(algorithm: EvictionPolicy, max_size: usize) -> Self {
        Self {
            algorithm,
            max_size,
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: CacheConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Reject settings no engine can be built from
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            warn!(algorithm = %self.algorithm, "rejecting cache config with zero max_size");
            return Err(Error::InvalidCapacity(self.max_size));
        }
        Ok(())
    }

    /// Build a bare engine from this config
    pub fn build<K, V>(&self) -> Result<CacheEngine<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        self.validate()?;
        let engine = CacheEngine::try_new(self.algorithm, self.max_size)?;
        info!(algorithm = %self.algorithm, max_size = self.max_size, "cache engine built");
        Ok(engine)
    }

    /// Build a thread-safe cache handle from this config
    pub fn build_shared<K, V>(&self) -> Result<SharedCache<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        self.build().map(SharedCache::from_engine)
    }
}
