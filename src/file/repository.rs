//! File metadata repository for STASH.

use sqlx::SqlitePool;

use super::entity::{FileEntity, NewFileEntity, ParentRef};
use crate::Result;

/// Children listings return at most this many entities per page.
pub const PAGE_SIZE: i64 = 20;

const COLUMNS: &str = "id, user_id, name, kind, is_public, parent_id, blob_ref";

/// Repository for file rows.
///
/// Holds no state beyond the pool reference; every call is an independent
/// query. Visibility updates are a single conditional statement scoped to
/// `(id, user_id)` so a caller can never mutate another owner's file.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a repository on the given pool.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new file entity and return the stored row.
    pub async fn create(&self, new_file: &NewFileEntity) -> Result<FileEntity> {
        let entity = sqlx::query_as::<_, FileEntity>(&format!(
            "INSERT INTO files (user_id, name, kind, is_public, parent_id, blob_ref)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        ))
        .bind(new_file.user_id)
        .bind(&new_file.name)
        .bind(new_file.kind.as_str())
        .bind(new_file.is_public)
        .bind(new_file.parent.as_raw())
        .bind(&new_file.blob_ref)
        .fetch_one(self.pool)
        .await?;

        Ok(entity)
    }

    /// Get a file by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileEntity>> {
        let entity = sqlx::query_as::<_, FileEntity>(&format!(
            "SELECT {COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entity)
    }

    /// Get a file by id, scoped to its owner.
    pub async fn get_for_owner(&self, id: i64, user_id: i64) -> Result<Option<FileEntity>> {
        let entity = sqlx::query_as::<_, FileEntity>(&format!(
            "SELECT {COLUMNS} FROM files WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entity)
    }

    /// List direct children of a parent, one page at a time.
    ///
    /// Pages are [`PAGE_SIZE`] entities in insertion order, skipping
    /// `page * PAGE_SIZE` entries. Each call restarts from the query; no
    /// cursor state is kept between calls.
    pub async fn children(&self, parent: ParentRef, page: u32) -> Result<Vec<FileEntity>> {
        let entities = sqlx::query_as::<_, FileEntity>(&format!(
            "SELECT {COLUMNS} FROM files WHERE parent_id = ?
             ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(parent.as_raw())
        .bind(PAGE_SIZE)
        .bind(page as i64 * PAGE_SIZE)
        .fetch_all(self.pool)
        .await?;

        Ok(entities)
    }

    /// Set the visibility flag of a file, scoped to its owner.
    ///
    /// A single conditional update: returns the updated row, or `None` when
    /// no row matches `(id, user_id)` - the caller cannot tell a missing
    /// file from someone else's file, by design of the query shape.
    pub async fn set_public(
        &self,
        id: i64,
        user_id: i64,
        is_public: bool,
    ) -> Result<Option<FileEntity>> {
        let entity = sqlx::query_as::<_, FileEntity>(&format!(
            "UPDATE files SET is_public = ? WHERE id = ? AND user_id = ?
             RETURNING {COLUMNS}"
        ))
        .bind(is_public)
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entity)
    }
}
