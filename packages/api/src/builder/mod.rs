//! Fluent request builder
//!
//! One module per concern: `core` holds the struct and orchestration
//! setters, `headers` and `body` the request-surface setters, `methods`
//! the terminal dispatch.

pub mod body;
pub mod core;
pub mod headers;
pub mod methods;

pub use self::core::{BodyNotSet, BodySet, FetchBuilder};
