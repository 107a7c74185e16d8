//! File entity types for STASH.
//!
//! A `FileEntity` is the internal row shape, blob reference included. The
//! wire shape is `FileRecord`, which strips the blob reference before
//! anything leaves the server.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// What a file entity is: a folder, an opaque file, or an image.
///
/// Images are the only kind with post-processing; folders are the only kind
/// that may be a parent and never carry content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    File,
    Image,
}

impl FileKind {
    /// Parse a kind from its wire form.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "folder" => Some(Self::Folder),
            "file" => Some(Self::File),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// The wire form of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
            Self::Image => "image",
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// Where a file entity hangs in the hierarchy.
///
/// Root is its own variant rather than a magic id; the wire format still
/// spells it `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Folder(i64),
}

impl ParentRef {
    /// Decode from the stored raw id (0 = root).
    pub fn from_raw(raw: i64) -> Self {
        if raw == 0 {
            Self::Root
        } else {
            Self::Folder(raw)
        }
    }

    /// Encode to the stored raw id (root = 0).
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::Root => 0,
            Self::Folder(id) => *id,
        }
    }
}

/// Parse an externally supplied identifier.
///
/// Anything that is not a positive integer in the store's id format is
/// rejected here, before it can reach a query.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// A stored file entity. Internal shape; see [`FileRecord`] for the wire
/// shape.
#[derive(Debug, Clone)]
pub struct FileEntity {
    pub id: i64,
    /// Owning user. Set at creation, never reassigned.
    pub user_id: i64,
    pub name: String,
    pub kind: FileKind,
    pub is_public: bool,
    pub parent: ParentRef,
    /// Blob storage reference; `None` exactly for folders. Never serialized.
    pub blob_ref: Option<String>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for FileEntity {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let kind_raw: String = row.try_get("kind")?;
        let kind = FileKind::parse(&kind_raw).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: format!("unknown file kind: {kind_raw}").into(),
        })?;
        let parent_raw: i64 = row.try_get("parent_id")?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            kind,
            is_public: row.try_get("is_public")?,
            parent: ParentRef::from_raw(parent_raw),
            blob_ref: row.try_get("blob_ref")?,
        })
    }
}

/// Data for creating a new file entity.
#[derive(Debug, Clone)]
pub struct NewFileEntity {
    pub user_id: i64,
    pub name: String,
    pub kind: FileKind,
    pub is_public: bool,
    pub parent: ParentRef,
    pub blob_ref: Option<String>,
}

/// The externally visible shape of a file entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub is_public: bool,
    pub parent_id: i64,
}

impl From<&FileEntity> for FileRecord {
    fn from(entity: &FileEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name.clone(),
            kind: entity.kind,
            is_public: entity.is_public,
            parent_id: entity.parent.as_raw(),
        }
    }
}
