//! Shared fixtures for integration tests.
#![allow(dead_code)]

use gridgrab::types::{Line, OcrPage, Rect, Word};

/// Horizontal distance between the left edges of adjacent table columns.
pub const COLUMN_PITCH: f64 = 120.0;
/// Vertical distance between the top edges of adjacent table rows.
pub const ROW_PITCH: f64 = 30.0;
/// Page margin before the first row and column.
pub const MARGIN: f64 = 10.0;
pub const CHAR_WIDTH: f64 = 8.0;
pub const WORD_HEIGHT: f64 = 12.0;

pub const TSV_HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

pub fn word(text: &str, x: f64, y: f64, width: f64, height: f64) -> Word {
    Word::new(text, Rect::from_xywh(x, y, width, height), 0)
}

/// Words of `text` laid out left to right from `(x, y)`, one space wide apart.
fn cell_words(text: &str, x: f64, y: f64, line_index: i32) -> Vec<Word> {
    let mut left = x;
    text.split_whitespace()
        .map(|token| {
            let width = token.chars().count() as f64 * CHAR_WIDTH;
            let word = Word::new(token, Rect::from_xywh(left, y, width, WORD_HEIGHT), line_index);
            left += width + CHAR_WIDTH;
            word
        })
        .collect()
}

pub fn cell_origin(row: usize, column: usize) -> (f64, f64) {
    (MARGIN + column as f64 * COLUMN_PITCH, MARGIN + row as f64 * ROW_PITCH)
}

/// A page where every non-empty table cell was recognized as its own line.
pub fn table_page(cells: &[&[&str]], language: &str) -> OcrPage {
    let mut lines = Vec::new();
    for (r, row) in cells.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let (x, y) = cell_origin(r, c);
            let index = lines.len() as i32;
            lines.push(Line::new(index, cell_words(text, x, y, index)));
        }
    }

    let columns = cells.iter().map(|row| row.len()).max().unwrap_or(0);
    OcrPage {
        lines,
        text_angle: None,
        language: language.to_string(),
        width: (2.0 * MARGIN + columns as f64 * COLUMN_PITCH) as u32,
        height: (2.0 * MARGIN + cells.len() as f64 * ROW_PITCH) as u32,
    }
}

/// Flat word list of a table page, one unit per cell word.
pub fn table_words(cells: &[&[&str]]) -> Vec<Word> {
    table_page(cells, "en").lines.into_iter().flat_map(|line| line.words).collect()
}

/// Tesseract TSV for the same layout as [`table_page`]: each cell is its own block.
pub fn table_tsv(cells: &[&[&str]]) -> String {
    let page = table_page(cells, "");
    let mut tsv = String::from(TSV_HEADER);
    tsv.push_str(&format!("\n1\t1\t0\t0\t0\t0\t0\t0\t{}\t{}\t-1\t", page.width, page.height));

    for (block, line) in page.lines.iter().enumerate() {
        for (index, word) in line.words.iter().enumerate() {
            tsv.push_str(&format!(
                "\n5\t1\t{}\t1\t1\t{}\t{}\t{}\t{}\t{}\t96.0\t{}",
                block + 1,
                index + 1,
                word.bounds.left,
                word.bounds.top,
                word.bounds.width(),
                word.bounds.height(),
                word.text
            ));
        }
    }
    tsv
}
