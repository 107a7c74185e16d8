//! On-disk blob storage for STASH.
//!
//! Content is stored in a flat directory under server-generated UUID names,
//! never under client-supplied filenames. Thumbnail derivatives sit next to
//! their original as `{blob_ref}_{width}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Result, StashError};

/// Content store rooted at a configured base directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    base_path: PathBuf,
}

impl BlobStore {
    /// Create a blob store, creating the base directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write content under a fresh random name and return that name.
    pub fn store(&self, content: &[u8]) -> Result<String> {
        let blob_ref = Uuid::new_v4().to_string();
        fs::write(self.path_for(&blob_ref), content)?;
        Ok(blob_ref)
    }

    /// Write a derivative of an existing blob at the given width.
    ///
    /// Regenerating the same width overwrites the same path.
    pub fn store_derivative(&self, blob_ref: &str, width: u32, content: &[u8]) -> Result<()> {
        fs::write(self.derivative_path(blob_ref, width), content)?;
        Ok(())
    }

    /// Read a blob's content.
    pub fn load(&self, blob_ref: &str) -> Result<Vec<u8>> {
        Self::read(&self.path_for(blob_ref))
    }

    /// Read a derivative's content.
    ///
    /// A derivative that has not been generated (yet) is indistinguishable
    /// from one that never will be: both are `NotFound`.
    pub fn load_derivative(&self, blob_ref: &str, width: u32) -> Result<Vec<u8>> {
        Self::read(&self.derivative_path(blob_ref, width))
    }

    /// Check if a blob exists.
    pub fn exists(&self, blob_ref: &str) -> bool {
        self.path_for(blob_ref).exists()
    }

    /// Check if a derivative exists.
    pub fn derivative_exists(&self, blob_ref: &str, width: u32) -> bool {
        self.derivative_path(blob_ref, width).exists()
    }

    /// Full path for a blob reference.
    pub fn path_for(&self, blob_ref: &str) -> PathBuf {
        self.base_path.join(blob_ref)
    }

    /// Full path for a derivative at the given width.
    pub fn derivative_path(&self, blob_ref: &str, width: u32) -> PathBuf {
        self.base_path.join(format!("{blob_ref}_{width}"))
    }

    fn read(path: &Path) -> Result<Vec<u8>> {
        match fs::read(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StashError::NotFound("content".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
