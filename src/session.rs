//! Session data model
//!
//! A session holds the ordered line records for one input image. It is
//! rebuilt from scratch for every image; nothing survives a run except the
//! files the writer emits.

use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Axis-aligned rectangle in original-image pixel coordinates.
///
/// Coordinates are always expressed in the source image's own pixel space,
/// never in display-scaled space, so written crops are independent of any
/// front-end scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A box is usable only if it covers at least one pixel.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clamp the box to the given image dimensions.
    pub fn clamped_to(&self, img_width: u32, img_height: u32) -> Self {
        let x = self.x.min(img_width.saturating_sub(1));
        let y = self.y.min(img_height.saturating_sub(1));
        Self {
            x,
            y,
            width: self.width.min(img_width - x),
            height: self.height.min(img_height - y),
        }
    }
}

/// One text line: its crop, transcription, and location in the source image.
#[derive(Debug, Clone)]
pub struct LineRecord {
    /// Crop of the source image covering this line
    pub image: DynamicImage,
    /// Transcribed text (OCR output, later corrected by the user)
    pub text: String,
    /// Location of the crop in original-image coordinates
    pub bbox: BoundingBox,
    /// Sequential index in detection/append order
    pub line_num: usize,
}

/// In-memory state for one input image.
#[derive(Debug)]
pub struct Session {
    /// Path of the source image
    pub source: PathBuf,
    /// Base name used for output file naming (source file stem)
    pub base_name: String,
    /// Ordered line records, numbered 0..N in append order
    pub lines: Vec<LineRecord>,
}

impl Session {
    /// Create an empty session for the given source image path.
    pub fn new(source: &Path) -> Self {
        let base_name = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        Self {
            source: source.to_path_buf(),
            base_name,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
