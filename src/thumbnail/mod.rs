//! Background worker for STASH.
//!
//! Consumes jobs off the queue, one at a time. Thumbnail jobs fan an image
//! out to three fixed widths; each width is generated independently, so one
//! bad width costs only itself. Jobs are idempotent - regenerating a width
//! overwrites the same derivative path.

use std::io::Cursor;

use image::imageops::FilterType;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::file::FileRepository;
use crate::queue::Job;
use crate::store::BlobStore;
use crate::user::UserRepository;
use crate::{Result, StashError};

/// Target widths for image derivatives, in pixels.
pub const THUMBNAIL_WIDTHS: [u32; 3] = [500, 250, 100];

/// Job handler behind the queue consumer.
#[derive(Clone)]
pub struct ThumbnailWorker {
    pool: SqlitePool,
    blobs: BlobStore,
}

impl ThumbnailWorker {
    pub fn new(pool: SqlitePool, blobs: BlobStore) -> Self {
        Self { pool, blobs }
    }

    /// Dispatch one job. Errors returned here are terminal for the job;
    /// the consumer loop logs them and moves on.
    pub async fn handle(&self, job: Job) -> Result<()> {
        match job {
            Job::Thumbnail { file_id, owner_id } => self.generate(file_id, owner_id).await,
            Job::Welcome { user_id } => self.welcome(user_id).await,
        }
    }

    async fn welcome(&self, user_id: i64) -> Result<()> {
        if user_id <= 0 {
            return Err(StashError::NotFound("user".to_string()));
        }
        let users = UserRepository::new(&self.pool);
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StashError::NotFound("user".to_string()))?;

        info!(user_id, email = %user.email, "welcome aboard");
        Ok(())
    }

    /// Generate all derivative widths for one image.
    ///
    /// The file must still exist under `(file_id, owner_id)`; a vanished
    /// file fails the job permanently, since retrying cannot help. Width
    /// failures are contained per width.
    async fn generate(&self, file_id: i64, owner_id: i64) -> Result<()> {
        if file_id <= 0 || owner_id <= 0 {
            return Err(StashError::NotFound("file".to_string()));
        }

        let repo = FileRepository::new(&self.pool);
        let file = repo
            .get_for_owner(file_id, owner_id)
            .await?
            .ok_or_else(|| StashError::NotFound("file".to_string()))?;

        let blob_ref = file
            .blob_ref
            .as_deref()
            .ok_or_else(|| StashError::NotFound("content".to_string()))?;
        let original = self.blobs.load(blob_ref)?;

        for width in THUMBNAIL_WIDTHS {
            match resize_to_width(&original, width) {
                Ok(derivative) => {
                    if let Err(e) = self.blobs.store_derivative(blob_ref, width, &derivative) {
                        warn!(file_id, width, error = %e, "failed to persist derivative");
                        continue;
                    }
                    info!(file_id, width, "derivative generated");
                }
                Err(e) => {
                    warn!(file_id, width, error = %e, "failed to generate derivative");
                }
            }
        }

        Ok(())
    }
}

/// Resize image bytes to the given width, preserving aspect ratio and the
/// source encoding.
fn resize_to_width(original: &[u8], width: u32) -> Result<Vec<u8>> {
    let format = image::guess_format(original).map_err(|e| StashError::Storage(e.to_string()))?;
    let img = image::load_from_memory(original).map_err(|e| StashError::Storage(e.to_string()))?;

    let ratio = width as f64 / img.width().max(1) as f64;
    let height = ((img.height() as f64 * ratio) as u32).max(1);
    let resized = img.resize(width, height, FilterType::Lanczos3);

    let mut buf = Cursor::new(Vec::new());
    resized
        .write_to(&mut buf, format)
        .map_err(|e| StashError::Storage(e.to_string()))?;
    Ok(buf.into_inner())
}
