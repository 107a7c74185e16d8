//! Upload pipeline for STASH.
//!
//! Turns an upload request into a stored file entity, or rejects it with
//! the first failing check. Order of operations matters: the blob is
//! written before the metadata row, so a crash in between can only orphan
//! a blob - metadata never references content that does not exist.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sqlx::SqlitePool;
use tracing::info;

use super::entity::{parse_id, FileKind, FileRecord, NewFileEntity, ParentRef};
use super::repository::FileRepository;
use crate::queue::{Job, JobProducer};
use crate::store::BlobStore;
use crate::{Result, StashError};

/// A raw upload request, as it arrives off the wire.
///
/// Everything is optional here; the pipeline reports the first missing or
/// invalid field in the order name, type, data, parent.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub name: Option<String>,
    /// Raw kind string; must be one of `file`, `image`, `folder`.
    pub kind: Option<String>,
    /// Base64-encoded content; required unless kind is `folder`.
    pub data: Option<String>,
    /// Raw parent id; absent or `"0"` means root.
    pub parent_id: Option<String>,
    pub is_public: bool,
}

/// Orchestrates validation, blob persistence, metadata insertion, and
/// post-processing enqueue for one upload.
pub struct UploadPipeline<'a> {
    pool: &'a SqlitePool,
    blobs: &'a BlobStore,
    queue: &'a JobProducer,
}

impl<'a> UploadPipeline<'a> {
    pub fn new(pool: &'a SqlitePool, blobs: &'a BlobStore, queue: &'a JobProducer) -> Self {
        Self { pool, blobs, queue }
    }

    /// Run one upload to completion.
    ///
    /// On success the stored entity is returned in its external shape.
    /// Validation failures carry the first failing check's message.
    pub async fn submit(&self, owner_id: i64, request: UploadRequest) -> Result<FileRecord> {
        let name = request
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StashError::Validation("Missing name".to_string()))?;

        let kind = request
            .kind
            .as_deref()
            .and_then(FileKind::parse)
            .ok_or_else(|| StashError::Validation("Missing or invalid type".to_string()))?;

        let data = if kind.is_folder() {
            // Folders never carry content, even if data was sent
            None
        } else {
            Some(
                request
                    .data
                    .ok_or_else(|| StashError::Validation("Missing data".to_string()))?,
            )
        };

        let parent = self.resolve_parent(request.parent_id.as_deref()).await?;

        // Blob first, metadata second.
        let blob_ref = match data {
            Some(encoded) => {
                let bytes = BASE64
                    .decode(encoded.as_bytes())
                    .map_err(|e| StashError::Validation(e.to_string()))?;
                let blob_ref = self
                    .blobs
                    .store(&bytes)
                    .map_err(|e| StashError::Validation(e.to_string()))?;
                Some(blob_ref)
            }
            None => None,
        };

        let repo = FileRepository::new(self.pool);
        let entity = repo
            .create(&NewFileEntity {
                user_id: owner_id,
                name,
                kind,
                is_public: request.is_public,
                parent,
                blob_ref,
            })
            .await?;

        info!(
            file_id = entity.id,
            owner_id,
            kind = entity.kind.as_str(),
            "file created"
        );

        // Best-effort: the upload is durable at this point, so a failed
        // enqueue only costs the thumbnails.
        if entity.kind == FileKind::Image {
            self.queue.enqueue(Job::Thumbnail {
                file_id: entity.id,
                owner_id,
            });
        }

        Ok(FileRecord::from(&entity))
    }

    /// Resolve the raw parent reference to a checked [`ParentRef`].
    ///
    /// A malformed id reads as an absent parent, so both report
    /// `Parent not found`; a parent that exists but is not a folder is its
    /// own error - never silently reparented to root.
    async fn resolve_parent(&self, raw: Option<&str>) -> Result<ParentRef> {
        let raw = match raw {
            None | Some("0") | Some("") => return Ok(ParentRef::Root),
            Some(raw) => raw,
        };

        let id = parse_id(raw)
            .ok_or_else(|| StashError::Validation("Parent not found".to_string()))?;

        let repo = FileRepository::new(self.pool);
        match repo.get_by_id(id).await? {
            None => Err(StashError::Validation("Parent not found".to_string())),
            Some(parent) if !parent.kind.is_folder() => {
                Err(StashError::Validation("Parent is not a folder".to_string()))
            }
            Some(_) => Ok(ParentRef::Folder(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue;
    use crate::store::Database;
    use crate::user::{NewUser, UserRepository};
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        blobs: BlobStore,
        producer: JobProducer,
        consumer: queue::JobConsumer,
        owner_id: i64,
        _dir: TempDir,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let dir = TempDir::new().unwrap();
        let blobs = BlobStore::new(dir.path()).unwrap();
        let (producer, consumer) = queue::channel();

        let users = UserRepository::new(db.pool());
        let owner = users.create(&NewUser::new("bob@x.com", "hash")).await.unwrap();

        Fixture {
            db,
            blobs,
            producer,
            consumer,
            owner_id: owner.id,
            _dir: dir,
        }
    }

    fn request(name: &str, kind: &str, data: Option<&str>) -> UploadRequest {
        UploadRequest {
            name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            data: data.map(|d| d.to_string()),
            parent_id: None,
            is_public: false,
        }
    }

    fn validation_message(result: Result<FileRecord>) -> String {
        match result {
            Err(StashError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_file_to_root() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let record = pipeline
            .submit(fx.owner_id, request("a.txt", "file", Some("aGVsbG8=")))
            .await
            .unwrap();

        assert_eq!(record.name, "a.txt");
        assert_eq!(record.kind, FileKind::File);
        assert_eq!(record.parent_id, 0);

        // The decoded content is on disk under the stored blob ref
        let repo = FileRepository::new(fx.db.pool());
        let entity = repo.get_by_id(record.id).await.unwrap().unwrap();
        let blob_ref = entity.blob_ref.expect("file should carry a blob ref");
        assert_eq!(fx.blobs.load(&blob_ref).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_folder_skips_blob_entirely() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let record = pipeline
            .submit(fx.owner_id, request("docs", "folder", Some("aWdub3JlZA==")))
            .await
            .unwrap();

        let repo = FileRepository::new(fx.db.pool());
        let entity = repo.get_by_id(record.id).await.unwrap().unwrap();
        assert!(entity.blob_ref.is_none());
    }

    #[tokio::test]
    async fn test_validation_order() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        // Missing name wins even when everything else is missing too
        let msg = validation_message(pipeline.submit(fx.owner_id, UploadRequest::default()).await);
        assert_eq!(msg, "Missing name");

        // Then type
        let msg = validation_message(
            pipeline
                .submit(
                    fx.owner_id,
                    UploadRequest {
                        name: Some("a".to_string()),
                        ..Default::default()
                    },
                )
                .await,
        );
        assert_eq!(msg, "Missing or invalid type");

        let msg = validation_message(pipeline.submit(fx.owner_id, request("a", "archive", None)).await);
        assert_eq!(msg, "Missing or invalid type");

        // Then data
        let msg = validation_message(pipeline.submit(fx.owner_id, request("a", "file", None)).await);
        assert_eq!(msg, "Missing data");
    }

    #[tokio::test]
    async fn test_parent_must_exist() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let mut req = request("a.txt", "file", Some("aGVsbG8="));
        req.parent_id = Some("9999".to_string());
        let msg = validation_message(pipeline.submit(fx.owner_id, req).await);
        assert_eq!(msg, "Parent not found");

        // Malformed parent id reads the same as an absent one
        let mut req = request("a.txt", "file", Some("aGVsbG8="));
        req.parent_id = Some("not-an-id".to_string());
        let msg = validation_message(pipeline.submit(fx.owner_id, req).await);
        assert_eq!(msg, "Parent not found");
    }

    #[tokio::test]
    async fn test_parent_must_be_folder() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let plain = pipeline
            .submit(fx.owner_id, request("plain.txt", "file", Some("aGVsbG8=")))
            .await
            .unwrap();

        let mut req = request("nested.txt", "file", Some("aGVsbG8="));
        req.parent_id = Some(plain.id.to_string());
        let msg = validation_message(pipeline.submit(fx.owner_id, req).await);
        assert_eq!(msg, "Parent is not a folder");
    }

    #[tokio::test]
    async fn test_upload_into_folder() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let folder = pipeline
            .submit(fx.owner_id, request("docs", "folder", None))
            .await
            .unwrap();

        let mut req = request("nested.txt", "file", Some("aGVsbG8="));
        req.parent_id = Some(folder.id.to_string());
        let nested = pipeline.submit(fx.owner_id, req).await.unwrap();
        assert_eq!(nested.parent_id, folder.id);
    }

    #[tokio::test]
    async fn test_invalid_base64_rejected() {
        let fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let result = pipeline
            .submit(fx.owner_id, request("a.txt", "file", Some("!!not base64!!")))
            .await;
        assert!(matches!(result, Err(StashError::Validation(_))));
    }

    #[tokio::test]
    async fn test_image_upload_enqueues_thumbnail_job() {
        let mut fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let record = pipeline
            .submit(fx.owner_id, request("pic.png", "image", Some("aGVsbG8=")))
            .await
            .unwrap();

        let job = fx.consumer.next().await.unwrap();
        assert_eq!(
            job,
            Job::Thumbnail {
                file_id: record.id,
                owner_id: fx.owner_id
            }
        );
    }

    #[tokio::test]
    async fn test_plain_file_enqueues_nothing() {
        let mut fx = setup().await;
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        pipeline
            .submit(fx.owner_id, request("a.txt", "file", Some("aGVsbG8=")))
            .await
            .unwrap();
        drop(fx.producer);
        assert!(fx.consumer.next().await.is_none());
    }

    #[tokio::test]
    async fn test_enqueue_failure_does_not_fail_upload() {
        let fx = setup().await;
        // Kill the consumer side before submitting
        drop(fx.consumer);
        let pipeline = UploadPipeline::new(fx.db.pool(), &fx.blobs, &fx.producer);

        let record = pipeline
            .submit(fx.owner_id, request("pic.png", "image", Some("aGVsbG8=")))
            .await
            .unwrap();

        // The upload itself still landed
        let repo = FileRepository::new(fx.db.pool());
        assert!(repo.get_by_id(record.id).await.unwrap().is_some());
    }
}
