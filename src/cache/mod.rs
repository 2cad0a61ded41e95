//! Cache-aside support for the vessels listing.
//!
//! - [`CacheStore`]: byte-level key/value store with per-entry TTL. Redis in
//!   production ([`crate::infra::cache::RedisStore`]), [`MemoryStore`] for
//!   tests and single-process runs.
//! - [`CacheGateway`]: typed read/write policy on top of a store. Reads never
//!   fail; they report [`CacheLookup::Miss`] or [`CacheLookup::Error`].
//! - [`MissCoalescer`]: optional per-key single-flight for cache misses.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "redis"
//! host = "127.0.0.1"
//! port = 6379
//! key = "BUQUES_EN_PUERTO"
//! ttl_seconds = 10
//! ```

mod coalesce;
pub(crate) mod config;
mod error;
mod gateway;
mod lock;
mod store;

pub use coalesce::MissCoalescer;
pub use config::CacheConfig;
pub use error::CacheError;
pub use gateway::{CacheGateway, CacheLookup};
pub use store::{CacheStore, MemoryStore};
