//! Tag-aware cache
//!
//! Values are stored under string keys and labelled with one or more tags.
//! Invalidating a tag evicts every key that was ever stored under it. There
//! is no TTL and no capacity bound: entries live until their tag is
//! invalidated or the process exits.

mod stats;
mod store;

#[cfg(test)]
mod property_tests;

pub use stats::CacheStats;
pub use store::TagAwareCache;
