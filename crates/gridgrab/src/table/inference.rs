//! Row and column discovery over recognized words.
//!
//! A thin horizontal probe is swept down the region and a thin vertical probe
//! across it, `grid_spacing` pixels apart. Consecutive probe hits form a band.
//! Every word is then assigned to the bands it intersects, and bands holding
//! too few words are folded into a neighbour. The assignment and merge steps
//! repeat for a fixed number of passes; the last pass only assigns.

use serde::{Deserialize, Serialize};

use super::merge::{merge_outlier_columns, merge_outlier_rows};
use super::model::{BandArena, ResultColumn, ResultRow, ResultTable};
use crate::types::{ColumnId, GridCell, Rect, RowId, Word};

pub const DEFAULT_GRID_SPACING: u32 = 3;
pub const DEFAULT_OUTLIER_THRESHOLD: usize = 2;
pub const DEFAULT_REFINE_PASSES: usize = 5;

/// Tuning for [`GridInferencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Pixels between two probes.
    pub grid_spacing: u32,
    /// Bands holding this many words or fewer are outliers.
    pub outlier_threshold: usize,
    /// Assignment passes, including the final one.
    pub refine_passes: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            grid_spacing: DEFAULT_GRID_SPACING,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            refine_passes: DEFAULT_REFINE_PASSES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Infers a row/column grid and writes each word's [`GridCell`].
#[derive(Debug, Clone, Default)]
pub struct GridInferencer {
    settings: GridSettings,
}

impl GridInferencer {
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Runs inference over `words` inside `region`.
    ///
    /// After the call every word's cell refers to a row and column present in
    /// the returned table, or is `None` on an axis where the word touches no
    /// band. Words are never reordered.
    pub fn infer(&self, words: &mut [Word], region: Rect) -> ResultTable {
        let spacing = self.settings.grid_spacing.max(1) as i32;
        let passes = self.settings.refine_passes.max(1);

        for word in words.iter_mut() {
            word.cell = GridCell::default();
        }

        if words.is_empty() || region.is_empty() {
            return ResultTable::default();
        }

        let row_hits = probe_hits(words, region, spacing, Axis::Vertical);
        let column_hits = probe_hits(words, region, spacing, Axis::Horizontal);

        let mut rows: BandArena<ResultRow> = runs(&row_hits, spacing)
            .into_iter()
            .enumerate()
            .map(|(i, (top, bottom))| ResultRow {
                id: RowId(i as u32),
                top,
                bottom,
            })
            .collect();
        let mut columns: BandArena<ResultColumn> = runs(&column_hits, spacing)
            .into_iter()
            .enumerate()
            .map(|(i, (left, right))| ResultColumn {
                id: ColumnId(i as u32),
                left,
                right,
            })
            .collect();

        tracing::debug!(
            "probe sweep over {}x{} region found {} rows and {} columns",
            region.width(),
            region.height(),
            rows.len(),
            columns.len()
        );

        let table_rect = Rect::new(
            column_hits.first().copied().unwrap_or(0) as f64,
            row_hits.first().copied().unwrap_or(0) as f64,
            column_hits.last().copied().unwrap_or(0) as f64,
            row_hits.last().copied().unwrap_or(0) as f64,
        );

        for pass in 0..passes {
            let is_final = pass + 1 == passes;
            for word in words.iter_mut() {
                word.cell = GridCell::default();
            }

            let sparse_rows = assign_rows(words, &rows, &table_rect, self.settings.outlier_threshold);
            merge_outlier_rows(&mut rows, &sparse_rows);

            let sparse_columns = assign_columns(words, &columns, &table_rect, self.settings.outlier_threshold);
            if is_final {
                if !sparse_columns.is_empty() {
                    tracing::debug!("keeping {} sparse columns after the final pass", sparse_columns.len());
                }
            } else {
                merge_outlier_columns(&mut columns, &sparse_columns);
            }
        }

        ResultTable::new(columns.into_vec(), rows.into_vec())
    }
}

/// Runs [`GridInferencer`] with default settings.
pub fn infer_grid(words: &mut [Word], region: Rect) -> ResultTable {
    GridInferencer::default().infer(words, region)
}

/// Probe positions along one axis that touch at least one word.
///
/// `Axis::Vertical` sweeps horizontal probes from top to bottom and yields y
/// positions; `Axis::Horizontal` sweeps vertical probes and yields x positions.
fn probe_hits(words: &[Word], region: Rect, spacing: i32, axis: Axis) -> Vec<i32> {
    let (origin, length) = match axis {
        Axis::Vertical => (region.top.floor() as i32, region.height()),
        Axis::Horizontal => (region.left.floor() as i32, region.width()),
    };
    let count = (length / spacing as f64).floor().max(0.0) as i32;

    (0..count)
        .map(|i| origin + i * spacing)
        .filter(|&position| {
            let p = position as f64;
            let probe = match axis {
                Axis::Vertical => Rect::new(region.left, p, region.right, p + 1.0),
                Axis::Horizontal => Rect::new(p, region.top, p + 1.0, region.bottom),
            };
            words.iter().any(|word| word.bounds.intersects(&probe))
        })
        .collect()
}

/// Groups ascending probe positions into maximal runs where each position is
/// exactly `spacing` after the previous one. Each run is `(first, last)`.
fn runs(positions: &[i32], spacing: i32) -> Vec<(i32, i32)> {
    let mut runs: Vec<(i32, i32)> = Vec::new();
    for &position in positions {
        match runs.last_mut() {
            Some((_, end)) if position - *end == spacing => *end = position,
            _ => runs.push((position, position)),
        }
    }
    runs
}

/// Assigns rows to words; returns the ids of rows holding too few words.
fn assign_rows(words: &mut [Word], rows: &BandArena<ResultRow>, table: &Rect, threshold: usize) -> Vec<RowId> {
    let mut sparse = Vec::new();
    for row in rows.iter() {
        let band = Rect::new(table.left, row.top as f64, table.right, row.bottom as f64);
        let mut count = 0;
        for word in words.iter_mut().filter(|word| word.bounds.intersects(&band)) {
            word.cell.row = Some(row.id);
            count += 1;
        }
        if count <= threshold {
            sparse.push(row.id);
        }
    }
    sparse
}

/// Assigns columns to words; returns the ids of columns holding too few words.
fn assign_columns(
    words: &mut [Word],
    columns: &BandArena<ResultColumn>,
    table: &Rect,
    threshold: usize,
) -> Vec<ColumnId> {
    let mut sparse = Vec::new();
    for column in columns.iter() {
        let band = Rect::new(column.left as f64, table.top, column.right as f64, table.bottom);
        let mut count = 0;
        for word in words.iter_mut().filter(|word| word.bounds.intersects(&band)) {
            word.cell.column = Some(column.id);
            count += 1;
        }
        if count <= threshold {
            sparse.push(column.id);
        }
    }
    sparse
}
