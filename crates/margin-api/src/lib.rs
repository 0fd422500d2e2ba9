//! JSON REST API for Margin.
//!
//! Exposes an axum [`Router`] backed by any [`margin_core::store::CommentStore`].
//! CORS, TLS, and transport concerns are the caller's responsibility.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/comment.json`  | Whole collection, storage order |
//! | `POST`   | `/comments`      | Body: one comment; returns 201 + stored comment |
//! | `DELETE` | `/comments/:id`  | 204, or 404 if nothing matched |
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(margin_api::api_router(store.clone(), WriteGate::serialized()))
//! ```

pub mod comments;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use margin_core::store::CommentStore;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub use error::ApiError;

// ─── Write gate ───────────────────────────────────────────────────────────────

/// Optional mutual exclusion around read-modify-write cycles.
///
/// A serialized gate makes create and delete requests take turns, so no
/// update is lost. An unguarded gate lets them interleave freely: two
/// concurrent writers may each load the same collection and the later save
/// wins.
#[derive(Clone)]
pub struct WriteGate(Option<Arc<Mutex<()>>>);

impl WriteGate {
  pub fn serialized() -> Self {
    Self(Some(Arc::new(Mutex::new(()))))
  }

  pub fn unguarded() -> Self {
    Self(None)
  }

  pub fn new(serialize: bool) -> Self {
    if serialize { Self::serialized() } else { Self::unguarded() }
  }

  pub fn is_serialized(&self) -> bool {
    self.0.is_some()
  }

  /// Wait for our turn. The write may proceed while the returned guard lives.
  pub async fn enter(&self) -> Option<OwnedMutexGuard<()>> {
    match &self.0 {
      Some(lock) => Some(lock.clone().lock_owned().await),
      None => None,
    }
  }
}

// ─── State ────────────────────────────────────────────────────────────────────

/// State shared by the comment handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub writes: WriteGate,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, writes: WriteGate) -> Router<()>
where
  S: CommentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/comment.json", get(comments::list::<S>))
    .route("/comments", post(comments::create::<S>))
    .route("/comments/{id}", delete(comments::remove::<S>))
    .with_state(ApiState { store, writes })
}
