//! OCR adapter layer
//!
//! Extracts line-level text and bounding boxes from an image. Two Tesseract
//! engines are available and tried in fixed order:
//! - Native (in-process via `leptess`) — preferred
//! - CLI (external `tesseract` binary via `rusty-tesseract`) — fallback
//!
//! A primary failure falls back to the next engine exactly once; total
//! failure surfaces an error so the caller can proceed with an empty line
//! set instead of crashing.

pub mod cli;
#[cfg(feature = "native-ocr")]
pub mod native;
pub mod tsv;

use anyhow::Result;
use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::OcrSettings;
use crate::session::{BoundingBox, LineRecord};

pub use cli::CliTesseract;
#[cfg(feature = "native-ocr")]
pub use native::NativeTesseract;

/// A detected text line before it becomes a session record.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Location in original-image coordinates
    pub bbox: BoundingBox,
    /// Recognized text (non-empty)
    pub text: String,
}

/// Errors surfaced by the adapter when no engine could produce a result.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to initialize OCR engine: {0:#}")]
    Init(anyhow::Error),
    #[error("all OCR engines failed; last error: {0:#}")]
    AllEnginesFailed(anyhow::Error),
}

/// A single OCR engine implementation.
///
/// Engines take `&mut self` because the underlying Tesseract API mutates
/// internal state (loaded page, recognition region) between calls.
pub trait OcrEngine {
    /// Engine identifier for log messages
    fn name(&self) -> &'static str;

    /// Detect text lines in the whole image.
    ///
    /// Success with zero lines is a valid result (blank page) and does not
    /// trigger fallback.
    fn detect_lines(&mut self, image: &DynamicImage) -> Result<Vec<TextLine>>;

    /// Recognize the text inside a single sub-rectangle of the image.
    fn recognize_region(&mut self, image: &DynamicImage, region: BoundingBox) -> Result<String>;
}

/// Engine stack tried in fixed order (primary first).
pub struct OcrAdapter {
    engines: Vec<Box<dyn OcrEngine>>,
}

impl OcrAdapter {
    /// Build the default engine stack from settings.
    ///
    /// If the native engine cannot initialize (missing tessdata, missing
    /// language model), the stack degrades to the CLI engine alone.
    pub fn new(settings: &OcrSettings) -> Self {
        let mut engines: Vec<Box<dyn OcrEngine>> = Vec::new();

        #[cfg(feature = "native-ocr")]
        match NativeTesseract::new(settings) {
            Ok(engine) => engines.push(Box::new(engine)),
            Err(e) => warn!("native Tesseract unavailable, using CLI engine only: {e:#}"),
        }
        engines.push(Box::new(CliTesseract::new(settings)));

        Self { engines }
    }

    /// Build an adapter from an explicit engine stack.
    pub fn with_engines(engines: Vec<Box<dyn OcrEngine>>) -> Self {
        Self { engines }
    }

    /// Extract line records from the image, numbered 0..N in detection order.
    ///
    /// Each engine is attempted at most once. Returns an error only when
    /// every engine failed.
    pub fn extract_lines(&mut self, image: &DynamicImage) -> Result<Vec<LineRecord>, OcrError> {
        let mut last_err = None;

        for engine in &mut self.engines {
            match engine.detect_lines(image) {
                Ok(lines) => {
                    info!("{}: detected {} text line(s)", engine.name(), lines.len());
                    return Ok(Self::to_records(image, lines));
                }
                Err(e) => {
                    warn!("{} line detection failed: {e:#}", engine.name());
                    last_err = Some(e);
                }
            }
        }

        Err(OcrError::AllEnginesFailed(
            last_err.unwrap_or_else(|| anyhow::anyhow!("no OCR engine configured")),
        ))
    }

    /// Recognize the text inside a sub-rectangle of the image.
    ///
    /// Returns an empty string when the region is degenerate or every engine
    /// failed; region OCR failures never abort the session.
    pub fn recognize_region(&mut self, image: &DynamicImage, region: BoundingBox) -> String {
        if !region.has_area() {
            return String::new();
        }

        for engine in &mut self.engines {
            match engine.recognize_region(image, region) {
                Ok(text) => {
                    debug!("{}: region OCR produced {} char(s)", engine.name(), text.len());
                    return text.trim().to_string();
                }
                Err(e) => warn!("{} region OCR failed: {e:#}", engine.name()),
            }
        }

        warn!(
            "region OCR failed on every engine for {}x{} box at ({}, {})",
            region.width, region.height, region.x, region.y
        );
        String::new()
    }

    /// Turn detected lines into numbered records with crops from the image.
    fn to_records(image: &DynamicImage, lines: Vec<TextLine>) -> Vec<LineRecord> {
        let (img_w, img_h) = (image.width(), image.height());

        lines
            .into_iter()
            .filter_map(|line| {
                let bbox = line.bbox.clamped_to(img_w, img_h);
                if !bbox.has_area() || line.text.is_empty() {
                    return None;
                }
                Some((bbox, line.text))
            })
            .enumerate()
            .map(|(line_num, (bbox, text))| LineRecord {
                image: image.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height),
                text,
                bbox,
                line_num,
            })
            .collect()
    }
}
