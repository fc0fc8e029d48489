//! In-process Tesseract engine (`leptess`)
//!
//! Preferred engine: no subprocess per call, and region OCR maps directly
//! onto Tesseract's recognition rectangle.

use anyhow::{Context, Result};
use image::DynamicImage;
use leptess::LepTess;
use std::io::Cursor;
use tracing::debug;

use crate::config::OcrSettings;
use crate::ocr::{tsv, OcrEngine, OcrError, TextLine};
use crate::session::BoundingBox;

pub struct NativeTesseract {
    api: LepTess,
    source_dpi: i32,
}

impl NativeTesseract {
    /// Initialize Tesseract with the configured tessdata path and language.
    pub fn new(settings: &OcrSettings) -> Result<Self, OcrError> {
        let datapath = settings.tessdata_dir.as_ref().map(|p| p.to_string_lossy());
        let api = LepTess::new(datapath.as_deref(), &settings.language)
            .with_context(|| format!("language '{}'", settings.language))
            .map_err(OcrError::Init)?;

        Ok(Self {
            api,
            source_dpi: settings.source_dpi as i32,
        })
    }

    /// Load the image into the Tesseract page via an in-memory PNG.
    fn set_image(&mut self, image: &DynamicImage) -> Result<()> {
        let mut png_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .context("failed to encode image as PNG")?;

        self.api
            .set_image_from_mem(&png_bytes)
            .context("failed to load image into Tesseract")?;
        self.api.set_source_resolution(self.source_dpi);
        Ok(())
    }
}

impl OcrEngine for NativeTesseract {
    fn name(&self) -> &'static str {
        "tesseract (native)"
    }

    fn detect_lines(&mut self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        self.set_image(image)?;

        let raw = self
            .api
            .get_tsv_text(0)
            .context("failed to read Tesseract TSV output")?;
        let rows = tsv::parse(&raw);
        debug!("native engine produced {} layout row(s)", rows.len());

        Ok(tsv::group_lines(&rows))
    }

    fn recognize_region(&mut self, image: &DynamicImage, region: BoundingBox) -> Result<String> {
        self.set_image(image)?;
        self.api.set_rectangle(
            region.x as i32,
            region.y as i32,
            region.width as i32,
            region.height as i32,
        );

        let text = self
            .api
            .get_utf8_text()
            .context("failed to read recognized text")?;
        Ok(text.trim().to_string())
    }
}
