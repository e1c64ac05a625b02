#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;
