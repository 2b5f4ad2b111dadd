//! # newscache
//!
//! Pluggable in-memory cache with LRU and LFU eviction, used to front a
//! read/write service and avoid repeated expensive lookups.
//!
//! ## Architecture
//! - **HashMap**: AHash for fast key lookups (O(1))
//! - **LRU**: index-linked recency trail, evicts from the head (O(1))
//! - **LFU**: chain of frequency buckets, FIFO within a tier (O(1))
//! - **SharedCache**: one mutex around the engine, plus hit/miss statistics
//!   and read-through / write-through wrappers for service calls
//!
//! ## Example
//! ```
//! use newscache::{CacheConfig, EvictionPolicy};
//!
//! let cache = CacheConfig::new(EvictionPolicy::Lfu, 2)
//!     .build_shared::<u64, String>()
//!     .unwrap();
//!
//! let news = cache
//!     .get_or_load(7, |id| Ok::<_, ()>(format!("news #{id}")))
//!     .unwrap();
//! assert_eq!(news, "news #7");
//! assert!(cache.contains_key(&7));
//! ```

#![warn(missing_docs)]

mod arena;
mod config;
mod engine;
mod error;
mod lfu;
mod lru;
mod shared;
mod stats;
mod traits;

pub use config::{CacheConfig, DEFAULT_MAX_SIZE};
pub use engine::{CacheEngine, EvictionPolicy};
pub use error::{Error, Result};
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};
pub use traits::Cache;
