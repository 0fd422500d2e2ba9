//! Error types for `margin-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required comment field was absent or empty.
  #[error("missing required field: {0}")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
