//! Folding sparse bands into their neighbours.

use super::model::{Band, BandArena, ResultColumn, ResultRow};
use crate::types::{ColumnId, RowId};

/// Merges each outlier column into the adjacent column.
///
/// The first column merges into the next one and the last into the previous
/// one. An interior column goes to whichever neighbour is closer, the previous
/// one on a tie. The surviving neighbour is widened to cover the outlier and
/// the outlier's id is dropped. Ids that are already gone are ignored, and a
/// lone column is kept.
///
/// Returns the number of columns removed.
pub fn merge_outlier_columns(columns: &mut BandArena<ResultColumn>, outliers: &[ColumnId]) -> usize {
    merge_outliers(columns, outliers)
}

/// Row merging is disabled: sparse rows stay where they are, so the outlier
/// list is only logged.
pub fn merge_outlier_rows(rows: &mut BandArena<ResultRow>, outliers: &[RowId]) -> usize {
    if !outliers.is_empty() {
        tracing::debug!("keeping {} sparse rows out of {}", outliers.len(), rows.len());
    }
    0
}

fn merge_outliers<B: Band>(arena: &mut BandArena<B>, outliers: &[B::Id]) -> usize {
    let mut outliers = outliers.to_vec();
    outliers.sort_unstable();
    outliers.dedup();

    let mut merged = 0;
    for id in outliers {
        let Some(index) = arena.position(id) else {
            continue;
        };
        if arena.len() < 2 {
            tracing::debug!("keeping lone band {}", id);
            continue;
        }
        if merge_at(arena, index) {
            merged += 1;
        }
    }
    merged
}

fn merge_at<B: Band>(arena: &mut BandArena<B>, index: usize) -> bool {
    let Some(outlier) = arena.at(index).copied() else {
        return false;
    };
    let (start, end) = outlier.span();
    let last = arena.len() - 1;

    let target = if index == 0 {
        1
    } else if index == last {
        last - 1
    } else {
        let prev_gap = arena.at(index - 1).map_or(i32::MAX, |prev| start - prev.span().1);
        let next_gap = arena.at(index + 1).map_or(i32::MAX, |next| next.span().0 - end);
        if next_gap < prev_gap { index + 1 } else { index - 1 }
    };

    let Some(neighbour) = arena.at_mut(target) else {
        return false;
    };
    let (n_start, n_end) = neighbour.span();
    neighbour.set_span(n_start.min(start), n_end.max(end));
    tracing::debug!("merged band {} into {}", outlier.id(), neighbour.id());

    arena.remove_at(index);
    true
}
