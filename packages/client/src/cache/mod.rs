//! Response caching subsystem
//!
//! Key derivation, TTL entries, the store itself, and HTTP date parsing
//! shared with the retry policy's `Retry-After` handling.

pub mod entry;
pub mod http_date;
pub mod key;
pub mod stats;
pub mod store;

pub use entry::CacheEntry;
pub use http_date::{HttpDateParseError, httpdate};
pub use key::generate_cache_key;
pub use stats::CacheStats;
pub use store::{CacheEvent, CacheStore};
