//! Anchor re-location.
//!
//! After a document is edited, the stored range of a comment may no longer
//! cover the text it was written against. [`relocate`] uses the snippet saved
//! in the anchor to find where that text lives now.

use crate::comment::{Anchor, Position};

/// Byte offsets of line starts, used to convert between 1-based
/// line/column positions and offsets into the document.
struct LineIndex<'a> {
  text:        &'a str,
  line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
  fn new(text: &'a str) -> Self {
    let line_starts = std::iter::once(0)
      .chain(text.match_indices('\n').map(|(i, _)| i + 1))
      .collect();
    Self { text, line_starts }
  }

  /// Content of line `idx` (0-based), without its terminator.
  fn line(&self, idx: usize) -> &'a str {
    let start = self.line_starts[idx];
    let end = self
      .line_starts
      .get(idx + 1)
      .map(|next| next - 1)
      .unwrap_or(self.text.len());
    &self.text[start..end]
  }

  /// Byte offset of `pos`, or `None` if it does not exist in the document.
  ///
  /// A column one past the last character of a line is valid (it addresses
  /// the line end).
  fn offset(&self, pos: Position) -> Option<usize> {
    let idx = (pos.line as usize).checked_sub(1)?;
    let col = (pos.column as usize).checked_sub(1)?;
    let start = *self.line_starts.get(idx)?;
    let line = self.line(idx);

    match line.char_indices().nth(col) {
      Some((byte, _)) => Some(start + byte),
      None if line.chars().count() == col => Some(start + line.len()),
      None => None,
    }
  }

  /// Like [`Self::offset`], but positions past the end of a line or of the
  /// document collapse onto the nearest valid offset.
  fn clamped_offset(&self, pos: Position) -> usize {
    let idx = (pos.line.max(1) as usize - 1).min(self.line_starts.len() - 1);
    let start = self.line_starts[idx];
    let line = self.line(idx);
    let col = pos.column.max(1) as usize - 1;
    line
      .char_indices()
      .nth(col)
      .map(|(byte, _)| start + byte)
      .unwrap_or(start + line.len())
  }

  fn position(&self, offset: usize) -> Position {
    let idx = self.line_starts.partition_point(|&s| s <= offset) - 1;
    let start = self.line_starts[idx];
    let column = self.text[start..offset].chars().count() + 1;
    Position::new(idx as u32 + 1, column as u32)
  }

  fn char_distance(&self, a: usize, b: usize) -> usize {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    self.text[lo..hi].chars().count()
  }
}

/// Find the range `anchor.text` occupies in `document` now.
///
/// Returns the anchor unchanged when its stored range still covers its
/// snippet. Otherwise picks the occurrence of the snippet closest to the
/// stored start (earlier occurrence on a tie). Returns `None` when the
/// snippet is empty or no longer appears anywhere.
pub fn relocate(document: &str, anchor: &Anchor) -> Option<Anchor> {
  if anchor.text.is_empty() {
    return None;
  }

  let index = LineIndex::new(document);

  if let (Some(start), Some(end)) =
    (index.offset(anchor.start()), index.offset(anchor.end()))
    && start <= end
    && document[start..end] == anchor.text
  {
    return Some(anchor.clone());
  }

  let origin = index.clamped_offset(anchor.start());
  let (found, _) = document
    .match_indices(anchor.text.as_str())
    .min_by_key(|(at, _)| index.char_distance(*at, origin))?;

  Some(Anchor::new(
    index.position(found),
    index.position(found + anchor.text.len()),
    anchor.text.clone(),
  ))
}
