//! Storage abstraction for the booking core.
//!
//! The core treats persistence as a document store with per-entity CRUD
//! and indexed lookup. The [`Store`] trait captures exactly the operations
//! the services need, including the atomic compare-and-swap on booking
//! status that serializes concurrent transitions, and check-and-insert
//! uniqueness for reviews and transactions.
//!
//! [`InMemoryStore`] is the reference backend used by the server binary
//! and the test suites.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use store::Store;
