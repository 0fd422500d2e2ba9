//! `margin` — command-line client for the Margin comment store.
//!
//! # Usage
//!
//! ```text
//! margin list --file /src/lib.rs
//! margin add --file /src/lib.rs --type "red underline" --content "fix this" \
//!   --start 3:1 --end 3:6 --text "let x"
//! margin rm c-1718000000000
//! margin watch --interval 2
//! margin locate c-1718000000000 ./src/lib.rs
//! ```

mod client;
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::ApiClient;
use margin_core::comment::Position;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "margin", about = "Client for the Margin comment store")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the margin server (default: http://localhost:3000).
  #[arg(long, env = "MARGIN_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print stored comments.
  List {
    /// Only comments on this document.
    #[arg(long)]
    file:  Option<String>,
    /// Print raw JSON instead of one line per comment.
    #[arg(long)]
    json:  bool,
  },
  /// Store a new comment.
  Add(commands::AddArgs),
  /// Delete every comment with the given id.
  Rm {
    id: String,
  },
  /// Poll the server and print comments as they appear or disappear.
  Watch {
    /// Seconds between polls.
    #[arg(long, default_value_t = 2)]
    interval: u64,
  },
  /// Find where a comment's snippet lives in the current version of a file.
  Locate {
    id:   String,
    path: PathBuf,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// Parse `LINE:COLUMN` (both 1-based).
pub(crate) fn parse_position(s: &str) -> Result<Position, String> {
  let (line, column) = s
    .split_once(':')
    .ok_or_else(|| format!("expected LINE:COLUMN, got {s:?}"))?;
  let line: u32 = line.trim().parse().map_err(|e| format!("bad line: {e}"))?;
  let column: u32 = column
    .trim()
    .parse()
    .map_err(|e| format!("bad column: {e}"))?;
  if line == 0 || column == 0 {
    return Err("lines and columns start at 1".to_string());
  }
  Ok(Position::new(line, column))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());

  let client = ApiClient::new(&base_url)?;

  match args.command {
    Command::List { file, json } => commands::list(&client, file.as_deref(), json).await,
    Command::Add(add) => commands::add(&client, add).await,
    Command::Rm { id } => commands::remove(&client, &id).await,
    Command::Watch { interval } => commands::watch(&client, interval).await,
    Command::Locate { id, path } => commands::locate(&client, &id, &path).await,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn position_parsing() {
    assert_eq!(parse_position("3:14"), Ok(Position::new(3, 14)));
    assert_eq!(parse_position(" 1 : 1 "), Ok(Position::new(1, 1)));
    assert!(parse_position("3").is_err());
    assert!(parse_position("0:1").is_err());
    assert!(parse_position("a:b").is_err());
  }

  #[test]
  fn args_parse_add() {
    let args = Args::try_parse_from([
      "margin", "add", "--file", "/a.ts", "--type", "red underline",
      "--content", "fix this", "--start", "1:1", "--end", "1:6", "--text", "let x",
    ])
    .unwrap();
    match args.command {
      Command::Add(add) => {
        assert_eq!(add.file, "/a.ts");
        assert_eq!(add.kind, "red underline");
        assert_eq!(add.start, Position::new(1, 1));
        assert!(add.id.is_none());
      }
      other => panic!("unexpected command {other:?}"),
    }
  }
}
