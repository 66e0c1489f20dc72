//! Data model shared by the post-processing stages.
//!
//! Everything here is created fresh per OCR pass and dropped on the next one;
//! nothing is persisted across captures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line index used when the backend did not report which line produced a word.
pub const UNKNOWN_LINE: i32 = -1;

/// Axis-aligned rectangle in pixel coordinates.
///
/// Intersection is inclusive on the edges: two rectangles that only touch
/// still intersect. A rectangle with a negative width or height is empty and
/// intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() < 0.0 || self.height() < 0.0
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.left <= self.right && other.right >= self.left && other.top <= self.bottom && other.bottom >= self.top
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Maps a rectangle measured on an image that was offset by `(dx, dy)` and
    /// then scaled by `factor` back to the original image.
    pub fn unscaled(&self, factor: f64, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.left / factor - dx,
            self.top / factor - dy,
            self.right / factor - dx,
            self.bottom / factor - dy,
        )
    }
}

/// Stable identity of an inferred table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u32);

/// Stable identity of an inferred table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u32);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Grid position of a word. `None` means grid inference has not placed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub row: Option<RowId>,
    pub column: Option<ColumnId>,
}

/// A recognized token.
///
/// `text`, `bounds` and `line_index` come from the OCR backend and are not
/// changed afterwards. `cell` is owned by grid inference and `selected` by
/// search selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bounds: Rect,
    #[serde(default = "default_line_index")]
    pub line_index: i32,
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub cell: GridCell,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

fn default_line_index() -> i32 {
    UNKNOWN_LINE
}

fn is_unassigned(cell: &GridCell) -> bool {
    cell.row.is_none() && cell.column.is_none()
}

impl Word {
    pub fn new(text: impl Into<String>, bounds: Rect, line_index: i32) -> Self {
        Self {
            text: text.into(),
            bounds,
            line_index,
            cell: GridCell::default(),
            selected: false,
        }
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }
}

/// Ordered words produced by one OCR line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    #[serde(default = "default_line_index")]
    pub index: i32,
    pub words: Vec<Word>,
}

impl Line {
    pub fn new(index: i32, words: Vec<Word>) -> Self {
        Self { index, words }
    }

    /// Union rectangle of the line's words; zero-sized at the origin when empty.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.words.iter();
        match iter.next() {
            Some(first) => iter.fold(first.bounds, |acc, word| acc.union(&word.bounds)),
            None => Rect::default(),
        }
    }

    /// Flattens the line into a single grid unit carrying `text`.
    pub fn to_unit(&self, text: impl Into<String>) -> Word {
        Word::new(text, self.bounds(), self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Everything an OCR backend reports for one raster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrPage {
    pub lines: Vec<Line>,
    /// Overall skew of the recognized text in degrees.
    #[serde(default)]
    pub text_angle: Option<f64>,
    /// BCP-47 locale tag (or Tesseract language code) the page was read with.
    #[serde(default)]
    pub language: String,
    pub width: u32,
    pub height: u32,
}

impl OcrPage {
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    pub fn word_heights(&self) -> Vec<f64> {
        self.words().map(Word::height).collect()
    }

    /// The full raster as a rectangle anchored at the origin.
    pub fn region(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Re-expresses a page recognized on a padded and scaled raster in the
    /// coordinates of the original capture.
    pub fn into_native(mut self, scale: f64, pad_offset: u32, native_width: u32, native_height: u32) -> Self {
        let offset = pad_offset as f64;
        for line in &mut self.lines {
            for word in &mut line.words {
                word.bounds = word.bounds.unscaled(scale, offset, offset);
            }
        }
        self.width = native_width;
        self.height = native_height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_touching_edges_intersect() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rect_zero_height_still_intersects() {
        let band = Rect::new(0.0, 12.0, 100.0, 12.0);
        let word = Rect::from_xywh(5.0, 10.0, 20.0, 8.0);
        assert!(band.intersects(&word));
    }

    #[test]
    fn test_rect_empty_never_intersects() {
        let empty = Rect::new(10.0, 10.0, 5.0, 20.0);
        let other = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        assert!(empty.is_empty());
        assert!(!empty.intersects(&other));
        assert_eq!(empty.area(), 0.0);
    }

    #[test]
    fn test_rect_disjoint() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(11.0, 11.0, 5.0, 5.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_line_bounds_is_union() {
        let line = Line::new(
            0,
            vec![
                Word::new("a", Rect::new(10.0, 5.0, 20.0, 15.0), 0),
                Word::new("b", Rect::new(25.0, 3.0, 40.0, 14.0), 0),
            ],
        );
        assert_eq!(line.bounds(), Rect::new(10.0, 3.0, 40.0, 15.0));
        assert_eq!(Line::default().bounds(), Rect::default());
    }

    #[test]
    fn test_page_into_native() {
        let page = OcrPage {
            lines: vec![Line::new(0, vec![Word::new("x", Rect::new(36.0, 36.0, 56.0, 56.0), 0)])],
            width: 200,
            height: 200,
            ..Default::default()
        };
        let native = page.into_native(2.0, 8, 40, 40);
        let word = native.words().next().unwrap();
        assert_eq!(word.bounds, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!((native.width, native.height), (40, 40));
    }

    #[test]
    fn test_word_deserialize_defaults() {
        let word: Word = serde_json::from_str(r#"{"text":"hi","bounds":{"left":0,"top":0,"right":4,"bottom":2}}"#)
            .unwrap();
        assert_eq!(word.line_index, UNKNOWN_LINE);
        assert_eq!(word.cell, GridCell::default());
        assert!(!word.selected);
    }
}
