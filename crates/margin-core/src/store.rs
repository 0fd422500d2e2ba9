//! The `CommentStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `margin-store-json`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::collection::CommentSet;

/// Durable storage for the whole comment collection.
///
/// A backend only loads and saves complete collections; every mutation is a
/// load, an in-memory change on the returned [`CommentSet`], and a save.
/// Backends do not coordinate concurrent writers.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CommentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the stored collection in storage order.
  ///
  /// A store that has never been written to yields an empty collection.
  /// Content that cannot be decoded is an error, never an empty result.
  fn load(
    &self,
  ) -> impl Future<Output = Result<CommentSet, Self::Error>> + Send + '_;

  /// Replace the stored collection with `comments`.
  ///
  /// Either the whole collection becomes durable or the previous one stays
  /// in place.
  fn save<'a>(
    &'a self,
    comments: &'a CommentSet,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
