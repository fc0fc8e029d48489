//! External-binary Tesseract engine (`rusty-tesseract`)
//!
//! Fallback when the in-process binding cannot initialize or fails at
//! recognition time. Shells out to the `tesseract` binary, so it relies on
//! the system installation and its tessdata.

use anyhow::{Context, Result};
use image::DynamicImage;
use rusty_tesseract::{Args as TessArgs, Image as TessImage};
use std::collections::HashMap;
use tracing::debug;

use crate::config::OcrSettings;
use crate::ocr::{tsv, OcrEngine, TextLine};
use crate::session::BoundingBox;

/// Page segmentation mode: fully automatic layout analysis.
const PSM_AUTO: i32 = 3;
/// Page segmentation mode: treat the image as a single text line.
const PSM_SINGLE_LINE: i32 = 7;

pub struct CliTesseract {
    language: String,
    source_dpi: i32,
}

impl CliTesseract {
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            language: settings.language.clone(),
            source_dpi: settings.source_dpi as i32,
        }
    }

    fn args(&self, psm: i32) -> TessArgs {
        TessArgs {
            lang: self.language.clone(),
            config_variables: HashMap::new(),
            dpi: Some(self.source_dpi),
            psm: Some(psm),
            oem: Some(3),
        }
    }
}

impl OcrEngine for CliTesseract {
    fn name(&self) -> &'static str {
        "tesseract (cli)"
    }

    fn detect_lines(&mut self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        let img = TessImage::from_dynamic_image(image)
            .context("failed to hand image to the tesseract binary")?;

        let output = rusty_tesseract::image_to_data(&img, &self.args(PSM_AUTO))
            .context("tesseract layout analysis failed")?;
        debug!("cli engine produced {} layout row(s)", output.data.len());

        let rows: Vec<tsv::TsvRow> = output
            .data
            .iter()
            .map(|d| tsv::TsvRow {
                level: d.level.max(0) as u32,
                left: d.left,
                top: d.top,
                width: d.width,
                height: d.height,
                conf: d.conf,
                text: d.text.clone(),
            })
            .collect();

        Ok(tsv::group_lines(&rows))
    }

    fn recognize_region(&mut self, image: &DynamicImage, region: BoundingBox) -> Result<String> {
        let crop = image.crop_imm(region.x, region.y, region.width, region.height);
        let img = TessImage::from_dynamic_image(&crop)
            .context("failed to hand crop to the tesseract binary")?;

        let text = rusty_tesseract::image_to_string(&img, &self.args(PSM_SINGLE_LINE))
            .context("tesseract recognition failed")?;
        Ok(text.trim().to_string())
    }
}
