//! [`CommentSet`] — the ordered collection held in the store document.
//!
//! Insertion order is storage order. The set is an owned value that callers
//! load, modify, and hand back to a [`CommentStore`](crate::store::CommentStore);
//! there is no process-wide registry of comments.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::comment::Comment;

/// Ordered list of comment records, serialised as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentSet(Vec<Comment>);

impl CommentSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
    self.0.iter()
  }

  /// Append a record at the end of the collection.
  pub fn push(&mut self, comment: Comment) {
    self.0.push(comment);
  }

  /// Remove every record whose id is `id`. Returns how many were removed.
  pub fn remove_id(&mut self, id: &str) -> usize {
    let before = self.0.len();
    self.0.retain(|c| c.id != id);
    before - self.0.len()
  }

  /// First record with the given id.
  pub fn get(&self, id: &str) -> Option<&Comment> {
    self.0.iter().find(|c| c.id == id)
  }

  /// Records attached to `file`, in storage order.
  pub fn for_file<'a>(
    &'a self,
    file: &'a str,
  ) -> impl Iterator<Item = &'a Comment> + 'a {
    self.0.iter().filter(move |c| c.file == file)
  }

  /// Compare this (older) snapshot against `newer`, keyed by id.
  pub fn diff<'a>(&'a self, newer: &'a CommentSet) -> SnapshotDiff<'a> {
    let old_ids: HashSet<&str> = self.0.iter().map(|c| c.id.as_str()).collect();
    let new_ids: HashSet<&str> =
      newer.0.iter().map(|c| c.id.as_str()).collect();

    SnapshotDiff {
      added:   newer
        .0
        .iter()
        .filter(|c| !old_ids.contains(c.id.as_str()))
        .collect(),
      removed: self
        .0
        .iter()
        .filter(|c| !new_ids.contains(c.id.as_str()))
        .collect(),
    }
  }
}

impl From<Vec<Comment>> for CommentSet {
  fn from(comments: Vec<Comment>) -> Self {
    Self(comments)
  }
}

impl FromIterator<Comment> for CommentSet {
  fn from_iter<I: IntoIterator<Item = Comment>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a CommentSet {
  type Item = &'a Comment;
  type IntoIter = std::slice::Iter<'a, Comment>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

/// Result of [`CommentSet::diff`].
#[derive(Debug, Default)]
pub struct SnapshotDiff<'a> {
  /// Present in the newer snapshot only.
  pub added:   Vec<&'a Comment>,
  /// Present in the older snapshot only.
  pub removed: Vec<&'a Comment>,
}

impl SnapshotDiff<'_> {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.removed.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::Map;

  use super::*;
  use crate::comment::{Anchor, Position};

  fn comment(id: &str, file: &str) -> Comment {
    Comment {
      id:            id.to_string(),
      file:          file.to_string(),
      kind:          "note".to_string(),
      title:         None,
      content:       format!("body of {id}"),
      suggestion:    None,
      is_suggesting: None,
      anchor:        Anchor::new(Position::new(1, 1), Position::new(1, 4), "abc"),
      extra:         Map::new(),
    }
  }

  #[test]
  fn remove_id_drops_every_duplicate() {
    let mut set: CommentSet =
      vec![comment("a", "/x"), comment("b", "/x"), comment("a", "/y")].into();
    assert_eq!(set.remove_id("a"), 2);
    assert_eq!(set.len(), 1);
    assert_eq!(set.iter().next().unwrap().id, "b");
  }

  #[test]
  fn remove_id_missing_leaves_set_alone() {
    let mut set: CommentSet = vec![comment("a", "/x")].into();
    assert_eq!(set.remove_id("zzz"), 0);
    assert_eq!(set.len(), 1);
  }

  #[test]
  fn for_file_keeps_storage_order() {
    let set: CommentSet = vec![
      comment("1", "/x"),
      comment("2", "/y"),
      comment("3", "/x"),
    ]
    .into();
    let ids: Vec<_> = set.for_file("/x").map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);
  }

  #[test]
  fn diff_reports_added_and_removed() {
    let old: CommentSet = vec![comment("1", "/x"), comment("2", "/x")].into();
    let new: CommentSet = vec![comment("2", "/x"), comment("3", "/x")].into();

    let diff = old.diff(&new);
    let added: Vec<_> = diff.added.iter().map(|c| c.id.as_str()).collect();
    let removed: Vec<_> = diff.removed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(added, ["3"]);
    assert_eq!(removed, ["1"]);
    assert!(old.diff(&old).is_empty());
  }

  #[test]
  fn serializes_as_array() {
    let set = CommentSet::new();
    assert_eq!(serde_json::to_string(&set).unwrap(), "[]");
  }
}
