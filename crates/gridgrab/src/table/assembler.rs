//! Tab-separated serialization of grid-assigned words.

use ahash::{AHashMap, AHashSet};

use super::model::ResultTable;
use crate::text::selected_or_all;
use crate::types::{ColumnId, Word};

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Tabs(usize),
    Text(&'a str),
}

/// Serializes words into rows of tab-separated cells.
///
/// Only selected words are used when any word is selected. Words are ordered
/// by row, then column, keeping input order within a cell. Rows are separated
/// by `\n`. Within a row, moving to a later column emits one tab per column
/// id skipped, so empty cells survive; moving back to an earlier column counts
/// from column 0. The last column seen carries over into the next row. When the
/// output has a single row no tabs are emitted at all.
///
/// Words sharing a cell are joined with a space in space-joining languages and
/// with nothing otherwise. Tabs are never padded with that separator.
pub fn assemble(words: &[Word], is_space_joining: bool) -> String {
    assemble_with(words, is_space_joining, |column| column.map_or(0, |id| id.0 as usize))
}

/// Like [`assemble`], but counts skipped columns by their position in `table`
/// rather than by raw id, so ids removed by merging do not become empty cells.
pub fn assemble_table(words: &[Word], table: &ResultTable, is_space_joining: bool) -> String {
    let positions: AHashMap<ColumnId, usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(position, column)| (column.id, position))
        .collect();

    assemble_with(words, is_space_joining, |column| {
        column.and_then(|id| positions.get(&id).copied()).unwrap_or(0)
    })
}

/// One word per line, in input order, ignoring the grid.
pub fn assemble_plain(words: &[Word]) -> String {
    selected_or_all(words)
        .into_iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn assemble_with<F>(words: &[Word], is_space_joining: bool, column_index: F) -> String
where
    F: Fn(Option<ColumnId>) -> usize,
{
    let mut cells = selected_or_all(words);
    cells.sort_by_key(|word| (word.cell.row, word.cell.column));

    let distinct_rows = cells.iter().map(|word| word.cell.row).collect::<AHashSet<_>>().len();
    let separator = if is_space_joining { " " } else { "" };

    let mut output = String::new();
    let mut line: Vec<Token<'_>> = Vec::new();
    let mut current_row = cells.first().and_then(|word| word.cell.row);
    let mut last_column = 0usize;

    for word in cells {
        if word.cell.row != current_row {
            flush_row(&mut output, &line, separator);
            output.push('\n');
            line.clear();
            current_row = word.cell.row;
        }

        let column = column_index(word.cell.column);
        if column != last_column && distinct_rows > 1 {
            let from = if column < last_column { 0 } else { last_column };
            let skipped = column - from;
            if skipped > 0 {
                line.push(Token::Tabs(skipped));
            }
        }
        last_column = column;
        line.push(Token::Text(word.text.as_str()));
    }
    flush_row(&mut output, &line, separator);

    output
}

fn flush_row(output: &mut String, tokens: &[Token<'_>], separator: &str) {
    let mut previous_was_text = false;
    for token in tokens {
        match *token {
            Token::Tabs(count) => {
                output.extend(std::iter::repeat_n('\t', count));
                previous_was_text = false;
            }
            Token::Text(text) => {
                if previous_was_text {
                    output.push_str(separator);
                }
                output.push_str(text);
                previous_was_text = true;
            }
        }
    }
}
