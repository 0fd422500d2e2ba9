//! HTTP server layer for Margin.
//!
//! Wraps the [`margin_api`] router with the middleware every deployment
//! needs: permissive CORS (the editor calls in from another origin) and
//! request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use margin_api::WriteGate;
use margin_core::store::CommentStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MARGIN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  /// Location of the comment document.
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// Make create/delete cycles take turns. Turning this off reproduces the
  /// unguarded behaviour where concurrent writers can lose updates.
  #[serde(default = "default_serialize_writes")]
  pub serialize_writes: bool,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  3000
}

fn default_store_path() -> PathBuf {
  PathBuf::from("comments.json")
}

fn default_serialize_writes() -> bool {
  true
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      store_path:       default_store_path(),
      serialize_writes: default_serialize_writes(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the server needs to build its router.
///
/// The write gate lives here, next to the store it guards: every router
/// built from clones of one state takes turns on the same gate.
#[derive(Clone)]
pub struct AppState<S: CommentStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub writes: WriteGate,
}

impl<S: CommentStore> AppState<S> {
  /// Wrap `store`, with a write gate chosen by `config.serialize_writes`.
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:  Arc::new(store),
      writes: WriteGate::new(config.serialize_writes),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete axum [`Router`] for the comment server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CommentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  margin_api::api_router(state.store, state.writes)
    .layer(CorsLayer::very_permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
