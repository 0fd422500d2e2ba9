//! Handlers for the comment endpoints.
//!
//! Every handler is one read-modify-write cycle over the store: load the
//! whole collection, change it in memory, save it back. Writes pass through
//! the [`WriteGate`](crate::WriteGate) first.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use margin_core::{
  collection::CommentSet,
  comment::{Anchor, Comment},
  store::CommentStore,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /comment.json`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<CommentSet>, ApiError>
where
  S: CommentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let comments = state.store.load().await.map_err(ApiError::store)?;
  Ok(Json(comments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /comments`.
///
/// Every field is optional at the decoding stage so that a missing field is
/// reported as a validation failure rather than a decoding failure.
#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub id:            Option<String>,
  pub file:          Option<String>,
  #[serde(rename = "type")]
  pub kind:          Option<String>,
  pub title:         Option<String>,
  pub content:       Option<String>,
  pub suggestion:    Option<String>,
  #[serde(alias = "isSuggesting")]
  pub is_suggesting: Option<bool>,
  pub anchor:        Option<Anchor>,
  #[serde(flatten)]
  pub extra:         Map<String, Value>,
}

impl CommentBody {
  /// Turn the body into a storable comment, rejecting absent or empty
  /// required fields.
  pub fn into_comment(self) -> margin_core::Result<Comment> {
    let anchor = self
      .anchor
      .ok_or(margin_core::Error::MissingField("anchor"))?;
    let comment = Comment {
      id:            self.id.unwrap_or_default(),
      file:          self.file.unwrap_or_default(),
      kind:          self.kind.unwrap_or_default(),
      title:         self.title,
      content:       self.content.unwrap_or_default(),
      suggestion:    self.suggestion,
      is_suggesting: self.is_suggesting,
      anchor,
      extra:         self.extra,
    };
    comment.validate()?;
    Ok(comment)
  }
}

/// `POST /comments` — returns 201 + the stored [`Comment`]. An id that is
/// already stored is a 400 and leaves the collection untouched.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let comment = body.into_comment()?;

  let _turn = state.writes.enter().await;
  let mut comments = state.store.load().await.map_err(ApiError::store)?;
  if comments.get(&comment.id).is_some() {
    return Err(ApiError::BadRequest(format!(
      "comment {} already exists",
      comment.id
    )));
  }
  comments.push(comment.clone());
  state.store.save(&comments).await.map_err(ApiError::store)?;

  tracing::info!(id = %comment.id, file = %comment.file, "comment created");
  Ok((StatusCode::CREATED, Json(comment)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /comments/:id` — removes every comment with that id.
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: CommentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let _turn = state.writes.enter().await;
  let mut comments = state.store.load().await.map_err(ApiError::store)?;

  let removed = comments.remove_id(&id);
  if removed == 0 {
    return Err(ApiError::NotFound(format!("comment {id} not found")));
  }
  state.store.save(&comments).await.map_err(ApiError::store)?;

  tracing::info!(%id, removed, "comment deleted");
  Ok(StatusCode::NO_CONTENT)
}
