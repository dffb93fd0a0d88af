//! SQLite backend for the sijil stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
