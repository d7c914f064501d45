//! Retry policy

pub mod policy;

pub use policy::{RetryDecision, delay_for, evaluate, retry_after};
