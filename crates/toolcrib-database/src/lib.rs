//! # toolcrib-database
//!
//! PostgreSQL connection management, migrations, repository implementations
//! and the [`InventoryStore`] abstraction the service layer runs against.
//! An in-memory store with the same transactional guarantees backs tests
//! and local tooling.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{InventoryStore, InventoryTransaction, MemoryInventoryStore, PgInventoryStore};
