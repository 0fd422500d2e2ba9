//! [`JsonFileStore`] — the JSON file implementation of [`CommentStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use margin_core::{collection::CommentSet, store::CommentStore};
use tokio::fs;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A comment store backed by a single JSON document.
///
/// Cloning is cheap — the path is reference-counted. The store keeps no
/// in-memory copy of the collection; every `load` reads the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: Arc<PathBuf>,
}

impl JsonFileStore {
  /// Point a store at `path`. Nothing is read or created until the first
  /// `load` or `save`.
  pub fn open(path: impl Into<PathBuf>) -> Self {
    Self { path: Arc::new(path.into()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Sibling file a document is staged in before it replaces the real one.
  /// Every call names a fresh file, so overlapping saves never share one.
  fn staging_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    self.path.with_file_name(name)
  }

  fn write_err(&self, source: std::io::Error) -> Error {
    Error::Write { path: self.path.to_path_buf(), source }
  }
}

// ─── CommentStore impl ───────────────────────────────────────────────────────

impl CommentStore for JsonFileStore {
  type Error = Error;

  async fn load(&self) -> Result<CommentSet> {
    let bytes = match fs::read(self.path.as_path()).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::warn!(
          path = %self.path.display(),
          "comment document does not exist yet, starting empty"
        );
        return Ok(CommentSet::new());
      }
      Err(source) => {
        return Err(Error::Read { path: self.path.to_path_buf(), source });
      }
    };

    serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt {
      path: self.path.to_path_buf(),
      source,
    })
  }

  async fn save(&self, comments: &CommentSet) -> Result<()> {
    let mut body = serde_json::to_string_pretty(comments)?;
    body.push('\n');

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .await
        .map_err(|e| self.write_err(e))?;
    }

    let staging = self.staging_path();
    if let Err(e) = fs::write(&staging, body.as_bytes()).await {
      fs::remove_file(&staging).await.ok();
      return Err(self.write_err(e));
    }
    if let Err(e) = fs::rename(&staging, self.path.as_path()).await {
      fs::remove_file(&staging).await.ok();
      return Err(self.write_err(e));
    }

    tracing::debug!(
      path = %self.path.display(),
      count = comments.len(),
      "saved comment document"
    );
    Ok(())
  }
}
