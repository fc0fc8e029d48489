//! Preview rendering
//!
//! Writes a copy of the source image with every line box outlined, the
//! console stand-in for an on-screen overlay.

use anyhow::{Context, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

use crate::session::LineRecord;

const BOX_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Render the source image with all line boxes outlined.
pub fn render_preview(image: &DynamicImage, lines: &[LineRecord]) -> RgbaImage {
    let mut canvas = image.to_rgba8();

    for record in lines {
        let bbox = record.bbox;
        if bbox.width == 0 || bbox.height == 0 {
            continue;
        }
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(bbox.x as i32, bbox.y as i32).of_size(bbox.width, bbox.height),
            BOX_COLOR,
        );
    }

    canvas
}

/// Render and write the preview to disk.
pub fn save_preview(image: &DynamicImage, lines: &[LineRecord], path: &Path) -> Result<()> {
    render_preview(image, lines)
        .save(path)
        .with_context(|| format!("failed to write preview to {path:?}"))
}
