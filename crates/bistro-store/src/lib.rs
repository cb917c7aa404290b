//! # bistro-store
//!
//! `Store` backends for bistro-boss-rs:
//!
//! 1. **PgStore** - sqlx/Postgres, the production backend
//! 2. **MemoryStore** - in-process, for integration tests and local runs
//!
//! Both implement `bistro_core::Store`; the API layer holds a
//! `BoxedStore` and never knows which backend is behind it.

pub mod memory;
pub mod postgres;

// Re-exports
pub use memory::MemoryStore;
pub use postgres::PgStore;
