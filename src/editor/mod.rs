//! Line Editor
//!
//! Interactive stage where the user reviews the OCR-proposed line boxes and
//! appends manually drawn ones. Every appended box is OCR'd on demand to
//! seed its transcription; no merge or overlap resolution is performed, the
//! last-drawn box simply appends.

pub mod draw;
pub mod preview;

use anyhow::Result;
use image::DynamicImage;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::ocr::OcrAdapter;
use crate::session::{BoundingBox, LineRecord};

pub use draw::BoxDraw;

/// How the interactive stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// Sequence frozen, pipeline continues
    Finished,
    /// User cancelled the whole run
    Aborted,
}

/// Editing state for one image: the current record sequence plus the means
/// to OCR newly drawn boxes.
pub struct LineEditor<'a> {
    image: &'a DynamicImage,
    adapter: &'a mut OcrAdapter,
    lines: Vec<LineRecord>,
}

impl<'a> LineEditor<'a> {
    /// Seed the editor with the adapter's detected lines for this image.
    pub fn new(
        image: &'a DynamicImage,
        adapter: &'a mut OcrAdapter,
        seed: Vec<LineRecord>,
    ) -> Self {
        Self {
            image,
            adapter,
            lines: seed,
        }
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// Append a manually drawn rectangle and OCR its crop.
    ///
    /// Zero-area boxes are ignored and create no record. The appended record
    /// keeps whatever text region OCR produced, possibly empty; the verifier
    /// stage is where the user fixes it up.
    pub fn add_box(&mut self, bbox: BoundingBox) -> Option<&LineRecord> {
        let bbox = bbox.clamped_to(self.image.width(), self.image.height());
        if !bbox.has_area() {
            return None;
        }

        let text = self.adapter.recognize_region(self.image, bbox);
        let record = LineRecord {
            image: self
                .image
                .crop_imm(bbox.x, bbox.y, bbox.width, bbox.height),
            text,
            bbox,
            line_num: self.lines.len(),
        };
        self.lines.push(record);
        self.lines.last()
    }

    /// Freeze and return the current sequence.
    pub fn finish(self) -> Vec<LineRecord> {
        self.lines
    }
}

/// Drive the editor from a command stream (one command per line).
///
/// Commands: `list`, `add X Y W H`, `drag X1 Y1 X2 Y2`, `preview [PATH]`,
/// `done`, `quit`. End of input counts as `done`. `drag` runs a full
/// press/release gesture through the drawing state machine, so it behaves
/// exactly like a pointer-driven front-end would.
pub fn run_interactive<R: BufRead, W: Write>(
    editor: &mut LineEditor,
    input: R,
    output: &mut W,
) -> Result<EditorOutcome> {
    writeln!(
        output,
        "Line editor: {} detected line(s). Commands: list, add X Y W H, drag X1 Y1 X2 Y2, preview [PATH], done, quit",
        editor.lines().len()
    )?;

    let mut draw = BoxDraw::new();

    for line in input.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("list") => {
                for record in editor.lines() {
                    writeln!(
                        output,
                        "  [{:3}] ({}, {}) {}x{}  {:?}",
                        record.line_num,
                        record.bbox.x,
                        record.bbox.y,
                        record.bbox.width,
                        record.bbox.height,
                        record.text
                    )?;
                }
            }
            Some("add") => match parse_box(parts.collect::<Vec<_>>()) {
                Some(bbox) => match editor.add_box(bbox) {
                    Some(record) => {
                        writeln!(output, "  added line {}: {:?}", record.line_num, record.text)?
                    }
                    None => writeln!(output, "  ignored: box has no area")?,
                },
                None => writeln!(output, "  usage: add X Y W H (pixels, original image)")?,
            },
            Some("drag") => match parse_gesture(parts.collect::<Vec<_>>()) {
                Some(((x1, y1), (x2, y2))) => {
                    draw.press(x1, y1);
                    draw.drag(x2, y2);
                    if let Some((left, top, right, bottom)) = draw.pending() {
                        debug!("drag gesture spans ({left}, {top}) to ({right}, {bottom})");
                    }
                    let added = match draw.release(x2, y2) {
                        Some(bbox) => editor.add_box(bbox),
                        None => None,
                    };
                    match added {
                        Some(record) => writeln!(
                            output,
                            "  added line {}: {:?}",
                            record.line_num, record.text
                        )?,
                        None => writeln!(output, "  ignored: box has no area")?,
                    }
                }
                None => writeln!(output, "  usage: drag X1 Y1 X2 Y2 (corner to corner)")?,
            },
            Some("preview") => {
                let path = parts.next().unwrap_or("preview.png");
                match preview::save_preview(editor.image, editor.lines(), Path::new(path)) {
                    Ok(()) => writeln!(output, "  preview written to {path}")?,
                    Err(e) => {
                        warn!("preview failed: {e:#}");
                        writeln!(output, "  preview failed: {e}")?
                    }
                }
            }
            Some("done") => return Ok(EditorOutcome::Finished),
            Some("quit") => {
                info!("line editing aborted by user");
                return Ok(EditorOutcome::Aborted);
            }
            Some(other) => writeln!(output, "  unknown command: {other}")?,
            None => {}
        }
    }

    Ok(EditorOutcome::Finished)
}

fn parse_box(args: Vec<&str>) -> Option<BoundingBox> {
    if args.len() != 4 {
        return None;
    }
    Some(BoundingBox::new(
        args[0].parse().ok()?,
        args[1].parse().ok()?,
        args[2].parse().ok()?,
        args[3].parse().ok()?,
    ))
}

fn parse_gesture(args: Vec<&str>) -> Option<((f32, f32), (f32, f32))> {
    if args.len() != 4 {
        return None;
    }
    Some((
        (args[0].parse().ok()?, args[1].parse().ok()?),
        (args[2].parse().ok()?, args[3].parse().ok()?),
    ))
}
