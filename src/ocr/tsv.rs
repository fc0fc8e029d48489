//! Tesseract TSV output parsing
//!
//! Both engines ultimately produce Tesseract's tabular layout data: one row
//! per layout element, with `level` 4 marking a text line and `level` 5 a
//! word. Line rows carry the line's bounding box but no text; the line's
//! text is the space-join of its word rows.

use crate::ocr::TextLine;
use crate::session::BoundingBox;

/// Tesseract layout level for a text line.
pub const LEVEL_TEXTLINE: u32 = 4;
/// Tesseract layout level for a word.
pub const LEVEL_WORD: u32 = 5;

/// One row of Tesseract TSV layout output.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvRow {
    pub level: u32,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Recognition confidence; negative for non-word rows
    pub conf: f32,
    pub text: String,
}

/// Parse raw TSV text (with header row) into layout rows.
///
/// Malformed rows are skipped rather than failing the whole page; Tesseract
/// occasionally emits short rows for empty pages.
pub fn parse(tsv: &str) -> Vec<TsvRow> {
    tsv.lines()
        .skip(1) // header
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<TsvRow> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 11 {
        return None;
    }

    Some(TsvRow {
        level: fields[0].parse().ok()?,
        left: fields[6].parse().ok()?,
        top: fields[7].parse().ok()?,
        width: fields[8].parse().ok()?,
        height: fields[9].parse().ok()?,
        conf: fields[10].parse().ok()?,
        text: fields.get(11).map(|s| s.to_string()).unwrap_or_default(),
    })
}

/// Reconstruct text lines from layout rows.
///
/// A level-4 row opens a line with its bounding box; subsequent level-5 rows
/// with non-negative confidence contribute words until the next line row.
/// Lines whose joined text is empty are dropped.
pub fn group_lines(rows: &[TsvRow]) -> Vec<TextLine> {
    let mut lines: Vec<(BoundingBox, Vec<&str>)> = Vec::new();

    for row in rows {
        match row.level {
            LEVEL_TEXTLINE => {
                if row.width > 0 && row.height > 0 {
                    let bbox = BoundingBox::new(
                        row.left.max(0) as u32,
                        row.top.max(0) as u32,
                        row.width as u32,
                        row.height as u32,
                    );
                    lines.push((bbox, Vec::new()));
                }
            }
            LEVEL_WORD if row.conf >= 0.0 => {
                let word = row.text.trim();
                if !word.is_empty() {
                    if let Some((_, words)) = lines.last_mut() {
                        words.push(word);
                    }
                }
            }
            _ => {}
        }
    }

    lines
        .into_iter()
        .filter_map(|(bbox, words)| {
            if words.is_empty() {
                None
            } else {
                Some(TextLine {
                    bbox,
                    text: words.join(" "),
                })
            }
        })
        .collect()
}
