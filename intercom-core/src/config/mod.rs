//! Link configuration
//!
//! A board's role and line settings are fixed when the firmware is built;
//! they are plain `const` values. With the `serde` feature the same types
//! can be persisted as postcard binary data, e.g. to keep a peripheral's
//! controller id in flash.

#[cfg(feature = "serde")]
pub mod store;
pub mod types;

#[cfg(feature = "serde")]
pub use store::ConfigError;
pub use types::*;
