//! Cache module for memoizing API responses in memory
//!
//! This module provides a TTL cache that stores raw response bodies keyed by
//! request URL. Entries expire a fixed interval after insertion and are reclaimed
//! by a background reaper task owned by the cache.

mod ttl;

pub use ttl::{CacheError, TtlCache};
