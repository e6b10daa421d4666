//! Testing utilities for the details screen core.
//!
//! Provides scriptable repositories so view-model behavior can be exercised
//! without a network or a database.

mod mock;

pub use mock::{followers, MemoryCacheRepository, MockCall, MockRemoteRepository};
