//! HTTP surface for STASH.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use handlers::AppState;
pub use router::create_router;
