pub mod constructors;
pub mod types;

// Re-export main types and functions
pub use constructors::*;
pub use types::{AbortReason, Error, Inner, Kind, Result};

// Type alias kept for call sites that read better with the long name
pub type FetchError = Error;
