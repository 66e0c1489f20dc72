//! Post-processing pipeline orchestration.
//!
//! One pass turns an [`OcrPage`] into output text:
//! 1. Grid units - one per line (joined, corrected text) or one per word
//! 2. Search selection - mark units matching the query
//! 3. Table mode - infer rows/columns over the units and assemble tab-separated text
//! 4. Text mode - the selected units one per line, or the whole page joined
//!    line by line and reordered for right-to-left languages
//!
//! A pass owns every collection it touches, so passes can run on any thread
//! and never share mutable state.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::core::config::{EngineConfig, TableUnit};
use crate::table::{GridInferencer, ResultTable, assemble_plain, assemble_table};
use crate::text::{LanguageProfile, fix_letter_number_errors, join_line, join_lines, join_tokens, select_matches};
use crate::types::{OcrPage, Rect, Word};

/// Everything one post-processing pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassOutput {
    /// Final text for the clipboard.
    pub text: String,
    /// Inferred grid; `None` outside table mode.
    pub table: Option<ResultTable>,
    /// Grid units with their cell assignment and selection state.
    pub units: Vec<Word>,
    /// Number of units selected by the search query.
    pub matches: usize,
    /// Joining rules the pass used.
    pub language: LanguageProfile,
}

/// Runs one post-processing pass over `page`.
///
/// `query` selects matching units (exact or substring per
/// `config.search.exact_match`); `None` or a blank query selects nothing.
pub fn post_process(page: &OcrPage, config: &EngineConfig, query: Option<&str>) -> PassOutput {
    let language = config.language_profile(&page.language);
    let mut units = grid_units(page, config, &language);

    let matches = match query {
        Some(query) => select_matches(&mut units, query, config.search.exact_match),
        None => 0,
    };

    let (text, table) = if config.table.enabled {
        let region = inference_region(page, &units);
        let table = GridInferencer::new(config.table.grid_settings()).infer(&mut units, region);
        tracing::debug!(
            "table pass: {} units into {} rows x {} columns",
            units.len(),
            table.rows.len(),
            table.columns.len()
        );
        (assemble_table(&units, &table, language.is_space_joining), Some(table))
    } else if matches > 0 {
        (assemble_plain(&units), None)
    } else {
        (join_lines(&page.lines, &language, config.correct_errors), None)
    };

    PassOutput {
        text,
        table,
        units,
        matches,
        language,
    }
}

/// Text of every word whose bounds contain `(x, y)`, joined per the page's
/// language after the configured language and space-joining overrides.
pub fn text_at_point(page: &OcrPage, config: &EngineConfig, x: f64, y: f64) -> String {
    let language = config.language_profile(&page.language);
    join_tokens(
        page.words()
            .filter(|word| word.bounds.contains_point(x, y))
            .map(|word| word.text.as_str()),
        language.is_space_joining,
    )
}

fn grid_units(page: &OcrPage, config: &EngineConfig, language: &LanguageProfile) -> Vec<Word> {
    match config.table.unit {
        TableUnit::Line => page
            .lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.to_unit(join_line(line, language.is_space_joining, config.correct_errors)))
            .collect(),
        TableUnit::Word => page
            .words()
            .map(|word| {
                let mut unit = Word::new(word.text.clone(), word.bounds, word.line_index);
                if config.correct_errors
                    && let Cow::Owned(fixed) = fix_letter_number_errors(&word.text)
                {
                    unit.text = fixed;
                }
                unit
            })
            .collect(),
    }
}

/// The page raster, or the extent of the units when the page size is unknown.
fn inference_region(page: &OcrPage, units: &[Word]) -> Rect {
    let region = page.region();
    if region.area() > 0.0 {
        return region;
    }

    let mut bounds = units.iter().map(|unit| unit.bounds);
    match bounds.next() {
        Some(first) => {
            let extent = bounds.fold(first, |acc, b| acc.union(&b));
            Rect::new(extent.left.min(0.0), extent.top.min(0.0), extent.right + 1.0, extent.bottom + 1.0)
        }
        None => Rect::default(),
    }
}
