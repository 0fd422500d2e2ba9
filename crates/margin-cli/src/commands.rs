//! Subcommand implementations.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Args;
use margin_core::{
  anchor::relocate,
  collection::CommentSet,
  comment::{Anchor, Comment, Position},
};
use serde_json::Map;

use crate::{client::ApiClient, parse_position};

/// Arguments of `margin add`.
#[derive(Args, Debug)]
pub struct AddArgs {
  /// Comment id; defaults to a time-based token.
  #[arg(long)]
  pub id:         Option<String>,
  /// Document the comment is attached to.
  #[arg(long)]
  pub file:       String,
  /// Style tag, e.g. "red underline".
  #[arg(long = "type")]
  pub kind:       String,
  #[arg(long)]
  pub content:    String,
  #[arg(long)]
  pub title:      Option<String>,
  /// Proposed replacement for the anchored text.
  #[arg(long)]
  pub suggestion: Option<String>,
  /// Start of the anchored range, LINE:COLUMN.
  #[arg(long, value_parser = parse_position)]
  pub start:      Position,
  /// End of the anchored range (exclusive), LINE:COLUMN.
  #[arg(long, value_parser = parse_position)]
  pub end:        Position,
  /// Text currently covered by the range.
  #[arg(long)]
  pub text:       String,
}

impl AddArgs {
  fn into_comment(self) -> Comment {
    let is_suggesting = self.suggestion.as_ref().map(|_| true);
    Comment {
      id:            self.id.unwrap_or_else(time_token),
      file:          self.file,
      kind:          self.kind,
      title:         self.title,
      content:       self.content,
      suggestion:    self.suggestion,
      is_suggesting,
      anchor:        Anchor::new(self.start, self.end, self.text),
      extra:         Map::new(),
    }
  }
}

fn time_token() -> String {
  format!("c-{}", Utc::now().timestamp_millis())
}

/// One-line human summary of a comment.
fn summary(comment: &Comment) -> String {
  let start = comment.anchor.start();
  let label = match &comment.title {
    Some(title) if !title.is_empty() => format!("{title}: "),
    _ => String::new(),
  };
  format!(
    "{}  {}:{}:{}  [{}] {}{}",
    comment.id, comment.file, start.line, start.column, comment.kind, label,
    comment.content
  )
}

// ─── list ─────────────────────────────────────────────────────────────────────

pub async fn list(client: &ApiClient, file: Option<&str>, json: bool) -> Result<()> {
  let comments = client.list().await?;
  let shown: CommentSet = match file {
    Some(file) => comments.for_file(file).cloned().collect(),
    None => comments,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&shown)?);
  } else {
    for comment in &shown {
      println!("{}", summary(comment));
    }
  }
  Ok(())
}

// ─── add ──────────────────────────────────────────────────────────────────────

pub async fn add(client: &ApiClient, args: AddArgs) -> Result<()> {
  let comment = args.into_comment();
  comment.validate()?;
  let stored = client.create(&comment).await?;
  println!("{}", serde_json::to_string_pretty(&stored)?);
  Ok(())
}

// ─── rm ───────────────────────────────────────────────────────────────────────

pub async fn remove(client: &ApiClient, id: &str) -> Result<()> {
  if client.delete(id).await? {
    println!("deleted {id}");
    Ok(())
  } else {
    Err(anyhow!("no comment with id {id}"))
  }
}

// ─── watch ────────────────────────────────────────────────────────────────────

pub async fn watch(client: &ApiClient, interval: u64) -> Result<()> {
  let period = Duration::from_secs(interval.max(1));
  let mut seen = client.list().await?;
  println!("watching {} comment(s); ctrl-c to stop", seen.len());

  loop {
    tokio::select! {
      _ = tokio::signal::ctrl_c() => return Ok(()),
      _ = tokio::time::sleep(period) => {}
    }

    let current = match client.list().await {
      Ok(current) => current,
      Err(e) => {
        tracing::warn!(error = %e, "poll failed, keeping last snapshot");
        continue;
      }
    };

    {
      let diff = seen.diff(&current);
      for comment in &diff.removed {
        println!("- {}", summary(comment));
      }
      for comment in &diff.added {
        println!("+ {}", summary(comment));
      }
    }
    seen = current;
  }
}

// ─── locate ───────────────────────────────────────────────────────────────────

pub async fn locate(client: &ApiClient, id: &str, path: &Path) -> Result<()> {
  let comments = client.list().await?;
  let comment = comments
    .get(id)
    .ok_or_else(|| anyhow!("no comment with id {id}"))?;
  let document = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;

  match relocate(&document, &comment.anchor) {
    Some(found) => {
      println!(
        "{}:{}:{}-{}:{}",
        path.display(),
        found.start_line_number,
        found.start_column,
        found.end_line_number,
        found.end_column
      );
      if found != comment.anchor {
        let was = comment.anchor.start();
        println!("(moved from {}:{})", was.line, was.column);
      }
      Ok(())
    }
    None => Err(anyhow!(
      "anchored text {:?} no longer appears in {}",
      comment.anchor.text,
      path.display()
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args() -> AddArgs {
    AddArgs {
      id:         None,
      file:       "/a.ts".to_string(),
      kind:       "red underline".to_string(),
      content:    "fix this".to_string(),
      title:      None,
      suggestion: None,
      start:      Position::new(1, 1),
      end:        Position::new(1, 6),
      text:       "let x".to_string(),
    }
  }

  #[test]
  fn generated_ids_are_time_tokens() {
    let comment = args().into_comment();
    let millis = comment.id.strip_prefix("c-").unwrap();
    assert!(millis.parse::<i64>().unwrap() > 0);
    assert!(comment.validate().is_ok());
  }

  #[test]
  fn suggestion_turns_suggesting_on() {
    let mut a = args();
    a.suggestion = Some("let y".to_string());
    let comment = a.into_comment();
    assert_eq!(comment.is_suggesting, Some(true));

    assert_eq!(args().into_comment().is_suggesting, None);
  }

  #[test]
  fn summary_line() {
    let mut a = args();
    a.id = Some("c-1".to_string());
    a.title = Some("naming".to_string());
    assert_eq!(
      summary(&a.into_comment()),
      "c-1  /a.ts:1:1  [red underline] naming: fix this"
    );
  }
}
