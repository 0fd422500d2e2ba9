//! Error type for `margin-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },

  /// The document exists but is not a JSON array of comments.
  #[error("corrupt comment document {}: {source}", .path.display())]
  Corrupt {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
