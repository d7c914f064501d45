//! Client facade
//!
//! [`FetchClient`] owns the shared cache, the in-flight queue, the
//! transport seam, and per-client defaults; the `execute` module carries
//! the request pipeline itself.

pub mod core;
pub mod execute;
pub mod stats;

pub use self::core::FetchClient;
pub use stats::{ClientStats, ClientStatsSnapshot};
