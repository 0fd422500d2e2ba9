//! margin-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `MARGIN_*` environment variables, points a JSON file store at
//! `store_path`, and serves the comment API over HTTP.
//!
//! ```toml
//! host             = "127.0.0.1"
//! port             = 3000
//! store_path       = "~/.local/share/margin/comments.json"
//! serialize_writes = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use margin_server::{AppState, ServerConfig};
use margin_store_json::JsonFileStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Margin comment store server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MARGIN"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);

  let store = JsonFileStore::open(&server_cfg.store_path);
  tracing::info!(
    path = %store.path().display(),
    serialize_writes = server_cfg.serialize_writes,
    "using comment document"
  );
  if !server_cfg.serialize_writes {
    tracing::warn!("write serialisation disabled; concurrent writers may lose updates");
  }

  let address = server_cfg.address();
  let state = AppState::new(store, server_cfg);
  let app = margin_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
