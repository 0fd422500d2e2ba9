//! Comment records — the only entity the store knows about.
//!
//! A comment is an annotation tied to a range of a document. The store treats
//! every field except `id` as opaque payload; `type` is a presentation hint
//! for the editor and is never interpreted here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

// ─── Positions ───────────────────────────────────────────────────────────────

/// A 1-based line/column position inside a document.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
  pub line:   u32,
  pub column: u32,
}

impl Position {
  pub const fn new(line: u32, column: u32) -> Self {
    Self { line, column }
  }
}

/// Stored range plus a snapshot of the text it covered when the comment was
/// written. The snapshot lets a client find the range again after the
/// document has been edited (see [`crate::anchor::relocate`]).
///
/// `endColumn` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
  pub start_line_number: u32,
  pub start_column:      u32,
  pub end_line_number:   u32,
  pub end_column:        u32,
  pub text:              String,
}

impl Anchor {
  pub fn new(start: Position, end: Position, text: impl Into<String>) -> Self {
    Self {
      start_line_number: start.line,
      start_column:      start.column,
      end_line_number:   end.line,
      end_column:        end.column,
      text:              text.into(),
    }
  }

  pub fn start(&self) -> Position {
    Position::new(self.start_line_number, self.start_column)
  }

  pub fn end(&self) -> Position {
    Position::new(self.end_line_number, self.end_column)
  }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

/// One stored annotation.
///
/// Field order here is the field order of the persisted document. Keys the
/// store does not know about are kept in `extra` and written back after the
/// known ones, so a client's payload round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id:            String,
  pub file:          String,
  #[serde(rename = "type")]
  pub kind:          String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title:         Option<String>,
  pub content:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suggestion:    Option<String>,
  #[serde(
    default,
    alias = "isSuggesting",
    skip_serializing_if = "Option::is_none"
  )]
  pub is_suggesting: Option<bool>,
  pub anchor:        Anchor,
  #[serde(flatten)]
  pub extra:         Map<String, Value>,
}

impl Comment {
  /// Check that every required field carries a value.
  ///
  /// `anchor` is always present on a constructed `Comment`; its presence on
  /// the wire is checked where the request body is decoded.
  pub fn validate(&self) -> Result<()> {
    require("id", &self.id)?;
    require("file", &self.file)?;
    require("type", &self.kind)?;
    require("content", &self.content)?;
    Ok(())
  }
}

fn require(field: &'static str, value: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::MissingField(field));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn scenario() -> Value {
    json!({
      "id": "c-1",
      "file": "/a.ts",
      "type": "red underline",
      "content": "fix this",
      "anchor": {
        "startLineNumber": 1,
        "startColumn": 1,
        "endLineNumber": 1,
        "endColumn": 5,
        "text": "let x"
      }
    })
  }

  #[test]
  fn deserializes_minimal_record() {
    let comment: Comment = serde_json::from_value(scenario()).unwrap();
    assert_eq!(comment.id, "c-1");
    assert_eq!(comment.kind, "red underline");
    assert_eq!(comment.anchor.start(), Position::new(1, 1));
    assert_eq!(comment.anchor.end(), Position::new(1, 5));
    assert!(comment.title.is_none());
    assert!(comment.extra.is_empty());
  }

  #[test]
  fn absent_optionals_are_not_written() {
    let comment: Comment = serde_json::from_value(scenario()).unwrap();
    assert_eq!(serde_json::to_value(&comment).unwrap(), scenario());
  }

  #[test]
  fn unknown_keys_survive() {
    let mut raw = scenario();
    raw["author"] = json!("sam");
    let comment: Comment = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(comment.extra.get("author"), Some(&json!("sam")));
    assert_eq!(serde_json::to_value(&comment).unwrap(), raw);
  }

  #[test]
  fn camel_case_suggesting_flag_is_accepted() {
    let mut raw = scenario();
    raw["suggestion"] = json!("let y");
    raw["isSuggesting"] = json!(true);
    let comment: Comment = serde_json::from_value(raw).unwrap();
    assert_eq!(comment.suggestion.as_deref(), Some("let y"));
    assert_eq!(comment.is_suggesting, Some(true));

    let out = serde_json::to_value(&comment).unwrap();
    assert_eq!(out["is_suggesting"], json!(true));
  }

  #[test]
  fn validate_rejects_empty_content() {
    let mut comment: Comment = serde_json::from_value(scenario()).unwrap();
    comment.content.clear();
    assert!(matches!(
      comment.validate(),
      Err(Error::MissingField("content"))
    ));
  }
}
