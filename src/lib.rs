//! STASH - a small authenticated file stash server.
//!
//! Users register and log in for a 24-hour bearer token, upload files,
//! images, and folders into a hierarchy, toggle per-file visibility, and
//! fetch content. Image uploads are post-processed asynchronously into
//! thumbnail derivatives at three fixed widths.

pub mod auth;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod queue;
pub mod store;
pub mod thumbnail;
pub mod user;
pub mod web;

pub use auth::{
    authenticate, can_read, hash_password, require_owner, verify_password, PasswordError,
    Sessions, SESSION_TTL_SECS,
};
pub use config::Config;
pub use error::{Result, StashError};
pub use file::{
    parse_id, FileEntity, FileKind, FileRecord, FileRepository, NewFileEntity, ParentRef,
    UploadPipeline, UploadRequest, PAGE_SIZE,
};
pub use queue::{Job, JobConsumer, JobProducer};
pub use store::{BlobStore, Database, KeyValueStore, MemoryStore, RedisStore};
pub use thumbnail::{ThumbnailWorker, THUMBNAIL_WIDTHS};
pub use user::{NewUser, User, UserRepository};
pub use web::{create_router, AppState};
