//! Durable storage: key-value store backends and the typed persistence
//! gateway the containers write through.

pub mod gateway;
pub mod store;

pub use gateway::{FeedProgressRecord, PersistenceGateway};
pub use store::{KeyValueStore, MemoryStore, SledStore};
