//! Rows, columns and the inferred table.
//!
//! During inference rows and columns live in a [`BandArena`]: an insertion
//! ordered map from stable id to band. Entries stay in geometric order, a merge
//! removes the outlier entry and widens its neighbour, and an id that has been
//! removed is never handed out again.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{ColumnId, Rect, RowId};

/// A one-dimensional extent along the table's vertical or horizontal axis.
pub trait Band: Copy + fmt::Debug {
    type Id: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    fn id(&self) -> Self::Id;

    /// `(start, end)` in pixels: `(top, bottom)` for rows, `(left, right)` for columns.
    fn span(&self) -> (i32, i32);

    fn set_span(&mut self, start: i32, end: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: RowId,
    pub top: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub id: ColumnId,
    pub left: i32,
    pub right: i32,
}

impl Band for ResultRow {
    type Id = RowId;

    fn id(&self) -> RowId {
        self.id
    }

    fn span(&self) -> (i32, i32) {
        (self.top, self.bottom)
    }

    fn set_span(&mut self, start: i32, end: i32) {
        self.top = start;
        self.bottom = end;
    }
}

impl Band for ResultColumn {
    type Id = ColumnId;

    fn id(&self) -> ColumnId {
        self.id
    }

    fn span(&self) -> (i32, i32) {
        (self.left, self.right)
    }

    fn set_span(&mut self, start: i32, end: i32) {
        self.left = start;
        self.right = end;
    }
}

/// Bands keyed by id, kept in geometric order.
#[derive(Debug, Clone)]
pub struct BandArena<B: Band> {
    bands: IndexMap<B::Id, B>,
}

impl<B: Band> Default for BandArena<B> {
    fn default() -> Self {
        Self { bands: IndexMap::new() }
    }
}

impl<B: Band> FromIterator<B> for BandArena<B> {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self {
            bands: iter.into_iter().map(|band| (band.id(), band)).collect(),
        }
    }
}

impl<B: Band> BandArena<B> {
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn contains(&self, id: B::Id) -> bool {
        self.bands.contains_key(&id)
    }

    pub fn get(&self, id: B::Id) -> Option<&B> {
        self.bands.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.bands.values()
    }

    pub fn ids(&self) -> Vec<B::Id> {
        self.bands.keys().copied().collect()
    }

    pub(crate) fn position(&self, id: B::Id) -> Option<usize> {
        self.bands.get_index_of(&id)
    }

    pub(crate) fn at(&self, index: usize) -> Option<&B> {
        self.bands.get_index(index).map(|(_, band)| band)
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut B> {
        self.bands.get_index_mut(index).map(|(_, band)| band)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<B> {
        self.bands.shift_remove_index(index).map(|(_, band)| band)
    }

    pub fn into_vec(self) -> Vec<B> {
        self.bands.into_values().collect()
    }
}

/// The inferred table: final columns and rows plus their bounding rectangle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<ResultRow>,
    pub bounds: Rect,
}

impl ResultTable {
    /// Builds a table whose bounds span from the first to the last band on each
    /// axis. An axis without bands contributes a zero-length extent at 0.
    pub fn new(columns: Vec<ResultColumn>, rows: Vec<ResultRow>) -> Self {
        let (left, right) = extent(columns.iter().map(Band::span));
        let (top, bottom) = extent(rows.iter().map(Band::span));

        Self {
            columns,
            rows,
            bounds: Rect::new(left as f64, top as f64, right as f64, bottom as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn column(&self, id: ColumnId) -> Option<&ResultColumn> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Horizontal separators, halfway between vertically adjacent rows.
    pub fn row_lines(&self) -> Vec<i32> {
        separators(&self.rows)
    }

    /// Vertical separators, halfway between horizontally adjacent columns.
    pub fn column_lines(&self) -> Vec<i32> {
        separators(&self.columns)
    }
}

fn extent(spans: impl Iterator<Item = (i32, i32)>) -> (i32, i32) {
    spans
        .fold(None, |acc: Option<(i32, i32)>, (start, end)| match acc {
            Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
            None => Some((start, end)),
        })
        .unwrap_or((0, 0))
}

fn separators<B: Band>(bands: &[B]) -> Vec<i32> {
    bands
        .windows(2)
        .map(|pair| {
            let (_, prev_end) = pair[0].span();
            let (next_start, _) = pair[1].span();
            prev_end + (next_start - prev_end) / 2
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(id: u32, left: i32, right: i32) -> ResultColumn {
        ResultColumn {
            id: ColumnId(id),
            left,
            right,
        }
    }

    fn row(id: u32, top: i32, bottom: i32) -> ResultRow {
        ResultRow { id: RowId(id), top, bottom }
    }

    #[test]
    fn test_arena_keeps_order_after_removal() {
        let mut arena: BandArena<ResultColumn> =
            [column(0, 0, 10), column(1, 20, 30), column(2, 40, 50)].into_iter().collect();

        assert_eq!(arena.position(ColumnId(2)), Some(2));
        let removed = arena.remove_at(1).unwrap();
        assert_eq!(removed.id, ColumnId(1));
        assert_eq!(arena.ids(), vec![ColumnId(0), ColumnId(2)]);
        assert_eq!(arena.position(ColumnId(2)), Some(1));
        assert!(!arena.contains(ColumnId(1)));
    }

    #[test]
    fn test_table_bounds_span_all_bands() {
        let table = ResultTable::new(
            vec![column(0, 3, 30), column(1, 60, 90)],
            vec![row(0, 12, 24), row(1, 48, 60)],
        );
        assert_eq!(table.bounds, Rect::new(3.0, 12.0, 90.0, 60.0));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_empty_table_has_zero_area_bounds() {
        let table = ResultTable::new(Vec::new(), Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.bounds.area(), 0.0);
    }

    #[test]
    fn test_separator_lines() {
        let table = ResultTable::new(
            vec![column(0, 0, 30), column(2, 60, 90), column(5, 100, 120)],
            vec![row(0, 0, 10), row(1, 20, 30)],
        );
        assert_eq!(table.column_lines(), vec![45, 95]);
        assert_eq!(table.row_lines(), vec![15]);
        assert_eq!(table.column(ColumnId(2)).map(|c| c.left), Some(60));
        assert!(table.column(ColumnId(1)).is_none());
        assert_eq!(table.row(RowId(1)).map(|r| r.bottom), Some(30));
    }
}
