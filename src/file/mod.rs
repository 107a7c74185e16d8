//! File entities, metadata repository, and the upload pipeline.

mod entity;
mod repository;
mod upload;

pub use entity::{parse_id, FileEntity, FileKind, FileRecord, NewFileEntity, ParentRef};
pub use repository::{FileRepository, PAGE_SIZE};
pub use upload::{UploadPipeline, UploadRequest};
