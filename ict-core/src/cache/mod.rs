//! The LRU + TTL signal cache (`spec.md` §4.10, §5 "Shared resource
//! policy"): the only piece of cross-request state in the pipeline.

pub mod lru_ttl;

pub use lru_ttl::{CacheLookup, CacheStats, SignalCache};
