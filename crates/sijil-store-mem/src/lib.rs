//! In-memory backend for the sijil stores.
//!
//! Holds everything behind an async `RwLock`; state lives exactly as long
//! as the owning handle. Selected with `store.backend = "memory"` in server
//! configuration, and used as the store double in tests across the
//! workspace.

mod store;

pub use store::MemStore;
