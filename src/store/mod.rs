//! Store clients for STASH.
//!
//! Three externally-backed capabilities, each constructed at process start
//! and passed down as an injected handle:
//! - [`Database`]: SQLite metadata store for users and files
//! - [`KeyValueStore`]: ephemeral key-expiry store for sessions
//! - [`BlobStore`]: on-disk content store for file bytes and derivatives

mod blob;
mod db;
mod kv;

pub use blob::BlobStore;
pub use db::Database;
pub use kv::{KeyValueStore, MemoryStore, RedisStore};
