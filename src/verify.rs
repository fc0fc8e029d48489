//! Text Verifier
//!
//! Interactive stage where the user steps through the frozen line sequence
//! and corrects transcriptions. An edit commits to the record immediately,
//! so navigating away and back never reverts to the original OCR text.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::info;

use crate::session::LineRecord;

/// Cursor over the frozen line sequence.
pub struct TextVerifier {
    lines: Vec<LineRecord>,
    cursor: usize,
}

impl TextVerifier {
    pub fn new(lines: Vec<LineRecord>) -> Self {
        Self { lines, cursor: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&LineRecord> {
        self.lines.get(self.cursor)
    }

    /// Replace the current record's text. No-op on an empty sequence.
    pub fn edit_current(&mut self, text: &str) {
        if let Some(record) = self.lines.get_mut(self.cursor) {
            record.text = text.to_string();
        }
    }

    /// Move forward; no-op at the last line.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.lines.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move backward; no-op at the first line.
    pub fn prev(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Return the corrected sequence.
    pub fn finish(self) -> Vec<LineRecord> {
        self.lines
    }
}

/// How the verification stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Finished,
    Aborted,
}

/// Drive the verifier from a command stream (one command per line).
///
/// Commands: `show`, `next`, `prev`, `edit TEXT`, `done`, `quit`. End of
/// input counts as `done`.
pub fn run_interactive<R: BufRead, W: Write>(
    verifier: &mut TextVerifier,
    input: R,
    output: &mut W,
) -> Result<VerifyOutcome> {
    writeln!(
        output,
        "Text verifier: {} line(s). Commands: show, next, prev, edit TEXT, done, quit",
        verifier.lines.len()
    )?;
    show_current(verifier, output)?;

    for line in input.lines() {
        let line = line?;
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r),
            None => (line.as_str(), ""),
        };

        match command {
            "show" => show_current(verifier, output)?,
            "next" => {
                if !verifier.next() {
                    writeln!(output, "  already at the last line")?;
                }
                show_current(verifier, output)?;
            }
            "prev" => {
                if !verifier.prev() {
                    writeln!(output, "  already at the first line")?;
                }
                show_current(verifier, output)?;
            }
            "edit" => {
                verifier.edit_current(rest);
                show_current(verifier, output)?;
            }
            "done" => return Ok(VerifyOutcome::Finished),
            "quit" => {
                info!("verification aborted by user");
                return Ok(VerifyOutcome::Aborted);
            }
            "" => {}
            other => writeln!(output, "  unknown command: {other}")?,
        }
    }

    Ok(VerifyOutcome::Finished)
}

fn show_current<W: Write>(verifier: &TextVerifier, output: &mut W) -> Result<()> {
    match verifier.current() {
        Some(record) => writeln!(
            output,
            "  line {}/{} at ({}, {}) {}x{}: {:?}",
            record.line_num + 1,
            verifier.lines.len(),
            record.bbox.x,
            record.bbox.y,
            record.bbox.width,
            record.bbox.height,
            record.text
        )?,
        None => writeln!(output, "  no lines to verify")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BoundingBox;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn records(texts: &[&str]) -> Vec<LineRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| LineRecord {
                image: DynamicImage::ImageRgb8(RgbImage::new(10, 5)),
                text: text.to_string(),
                bbox: BoundingBox::new(0, (i as u32) * 10, 10, 5),
                line_num: i,
            })
            .collect()
    }

    #[test]
    fn test_navigation_noop_at_boundaries() {
        let mut v = TextVerifier::new(records(&["a", "b"]));
        assert!(!v.prev());
        assert_eq!(v.cursor(), 0);
        assert!(v.next());
        assert!(!v.next());
        assert_eq!(v.cursor(), 1);
    }

    #[test]
    fn test_edit_survives_navigation() {
        let mut v = TextVerifier::new(records(&["Helo", "World"]));
        v.edit_current("Hello");
        v.next();
        v.prev();
        assert_eq!(v.current().unwrap().text, "Hello");

        let lines = v.finish();
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_edit_on_empty_sequence_is_noop() {
        let mut v = TextVerifier::new(vec![]);
        v.edit_current("anything");
        assert!(v.current().is_none());
        assert!(v.finish().is_empty());
    }

    #[test]
    fn test_interactive_edit_and_navigate() {
        let mut v = TextVerifier::new(records(&["Helo", "Wrld"]));
        let input = Cursor::new("edit Hello\nnext\nedit World\nprev\nshow\ndone\n");
        let mut output = Vec::new();

        let outcome = run_interactive(&mut v, input, &mut output).unwrap();
        assert_eq!(outcome, VerifyOutcome::Finished);

        let lines = v.finish();
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_interactive_edit_preserves_spaces() {
        let mut v = TextVerifier::new(records(&["x"]));
        let input = Cursor::new("edit two  words\ndone\n");
        let mut output = Vec::new();
        run_interactive(&mut v, input, &mut output).unwrap();

        assert_eq!(v.finish()[0].text, "two  words");
    }

    #[test]
    fn test_interactive_boundary_messages() {
        let mut v = TextVerifier::new(records(&["only"]));
        let input = Cursor::new("prev\nnext\ndone\n");
        let mut output = Vec::new();
        run_interactive(&mut v, input, &mut output).unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("already at the first line"));
        assert!(printed.contains("already at the last line"));
    }

    #[test]
    fn test_interactive_quit_aborts() {
        let mut v = TextVerifier::new(records(&["x"]));
        let input = Cursor::new("quit\n");
        let mut output = Vec::new();
        assert_eq!(
            run_interactive(&mut v, input, &mut output).unwrap(),
            VerifyOutcome::Aborted
        );
    }
}
