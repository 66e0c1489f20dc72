use indexmap::IndexMap;

use crate::types::{Line, OcrPage, Rect, Word};
use crate::{GridgrabError, Result};

/// TSV parsing constants
pub const TSV_PAGE_LEVEL: u32 = 1;
pub const TSV_WORD_LEVEL: u32 = 5;
pub const TSV_MIN_FIELDS: usize = 12;

type LineKey = (u32, u32, u32, u32);

fn parse_u32(field: &str) -> u32 {
    field.trim().parse().unwrap_or(0)
}

fn parse_f64(field: &str) -> f64 {
    field.trim().parse().unwrap_or(0.0)
}

/// Build an [`OcrPage`] from Tesseract TSV output.
///
/// Word rows (level 5) are grouped into lines by their
/// `(page_num, block_num, par_num, line_num)` key, in order of first
/// appearance. Words below `min_confidence` and empty words are dropped;
/// malformed rows are skipped. The page size comes from the level-1 row, or
/// from the extent of the words when that row is missing.
///
/// # Errors
///
/// Returns `GridgrabError::Parsing` when the input is not empty but does not
/// start with a TSV header row.
pub fn extract_page_from_tsv(tsv_data: &str, min_confidence: f64) -> Result<OcrPage> {
    let mut rows = tsv_data.lines();

    match rows.next().map(str::trim) {
        None => return Ok(OcrPage::default()),
        Some(header) if header.starts_with("level") => {}
        Some(header) if header.is_empty() => return Ok(OcrPage::default()),
        Some(header) => {
            return Err(GridgrabError::parsing(format!(
                "Expected Tesseract TSV header, found '{}'",
                header.chars().take(40).collect::<String>()
            )));
        }
    }

    let mut lines: IndexMap<LineKey, Vec<Word>> = IndexMap::new();
    let mut page_size: Option<(u32, u32)> = None;

    for row in rows {
        let row = row.trim_end_matches(['\r', '\n']);
        if row.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS - 1 {
            continue;
        }

        let level = parse_u32(fields[0]);
        if level == TSV_PAGE_LEVEL && page_size.is_none() {
            page_size = Some((parse_u32(fields[8]), parse_u32(fields[9])));
            continue;
        }
        if level != TSV_WORD_LEVEL || fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let conf = fields[10].trim().parse::<f64>().unwrap_or(-1.0);
        if conf < min_confidence {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let key = (
            parse_u32(fields[1]),
            parse_u32(fields[2]),
            parse_u32(fields[3]),
            parse_u32(fields[4]),
        );
        let line_index = lines.get_index_of(&key).unwrap_or(lines.len()) as i32;
        let bounds = Rect::from_xywh(
            parse_f64(fields[6]),
            parse_f64(fields[7]),
            parse_f64(fields[8]),
            parse_f64(fields[9]),
        );

        lines
            .entry(key)
            .or_default()
            .push(Word::new(text, bounds, line_index));
    }

    let lines: Vec<Line> = lines
        .into_values()
        .enumerate()
        .map(|(index, words)| Line::new(index as i32, words))
        .collect();

    let (width, height) = page_size.unwrap_or_else(|| {
        lines
            .iter()
            .map(Line::bounds)
            .fold((0, 0), |(w, h), bounds| {
                (w.max(bounds.right.ceil() as u32), h.max(bounds.bottom.ceil() as u32))
            })
    });

    Ok(OcrPage {
        lines,
        text_angle: None,
        language: String::new(),
        width,
        height,
    })
}
