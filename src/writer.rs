//! Ground-Truth Writer
//!
//! Persists the corrected line records as Tesseract training pairs:
//! `<base>_l<NNN>.tif` (the crop) next to `<base>_l<NNN>.gt.txt` (the
//! transcription plus a single trailing newline).

use anyhow::{Context, Result};
use image::ImageFormat;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::session::LineRecord;

/// Per-batch write tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub written: usize,
    pub failed: usize,
}

/// Deterministic stem for one record: base name plus zero-padded index.
pub fn record_stem(base: &str, line_num: usize) -> String {
    format!("{base}_l{line_num:03}")
}

/// Write every record's image/text pair into `out_dir` (created if absent).
///
/// A failing record is logged and skipped; it never aborts the batch. Only
/// an unusable output directory fails the call as a whole.
pub fn write_ground_truth(
    records: &[LineRecord],
    base: &str,
    out_dir: &Path,
) -> Result<WriteSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {out_dir:?}"))?;

    info!("writing {} ground-truth pair(s) to {out_dir:?}", records.len());

    let mut summary = WriteSummary::default();
    for record in records {
        match write_record(record, base, out_dir) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                warn!("skipping line {}: {e:#}", record.line_num);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn write_record(record: &LineRecord, base: &str, out_dir: &Path) -> Result<()> {
    let stem = record_stem(base, record.line_num);
    let tif_path = out_dir.join(format!("{stem}.tif"));
    let txt_path = out_dir.join(format!("{stem}.gt.txt"));

    record
        .image
        .save_with_format(&tif_path, ImageFormat::Tiff)
        .with_context(|| format!("failed to write {tif_path:?}"))?;

    // Tesseract training expects exactly one trailing newline
    fs::write(&txt_path, format!("{}\n", record.text))
        .with_context(|| format!("failed to write {txt_path:?}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BoundingBox;
    use image::{DynamicImage, RgbImage};

    fn record(line_num: usize, text: &str) -> LineRecord {
        LineRecord {
            image: DynamicImage::ImageRgb8(RgbImage::new(20, 10)),
            text: text.to_string(),
            bbox: BoundingBox::new(0, (line_num as u32) * 12, 20, 10),
            line_num,
        }
    }

    #[test]
    fn test_record_stem_zero_padding() {
        assert_eq!(record_stem("doc1", 0), "doc1_l000");
        assert_eq!(record_stem("doc1", 42), "doc1_l042");
        assert_eq!(record_stem("doc1", 1234), "doc1_l1234");
    }

    #[test]
    fn test_writes_paired_files_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(0, "Hello"), record(1, "World")];

        let summary = write_ground_truth(&records, "doc1", dir.path()).unwrap();
        assert_eq!(summary, WriteSummary { written: 2, failed: 0 });

        assert!(dir.path().join("doc1_l000.tif").exists());
        assert!(dir.path().join("doc1_l001.tif").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("doc1_l000.gt.txt")).unwrap(),
            "Hello\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("doc1_l001.gt.txt")).unwrap(),
            "World\n"
        );
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("gt");

        let summary = write_ground_truth(&[record(0, "x")], "doc", &nested).unwrap();
        assert_eq!(summary.written, 1);
        assert!(nested.join("doc_l000.gt.txt").exists());
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let summary = write_ground_truth(&[], "doc", dir.path()).unwrap();
        assert_eq!(summary, WriteSummary::default());
    }

    #[test]
    fn test_unusable_output_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "a plain file").unwrap();

        assert!(write_ground_truth(&[record(0, "x")], "doc", &blocker).is_err());
    }

    #[test]
    fn test_failing_record_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();

        // A directory squatting on the .tif path makes that record fail
        // while the others are still written.
        fs::create_dir_all(dir.path().join("doc_l001.tif")).unwrap();
        let records = vec![record(0, "first"), record(1, "broken"), record(2, "last")];

        let summary = write_ground_truth(&records, "doc", dir.path()).unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(summary.failed, 1);
        assert!(dir.path().join("doc_l000.gt.txt").exists());
        assert!(dir.path().join("doc_l002.gt.txt").exists());
        assert!(!dir.path().join("doc_l001.gt.txt").exists());
    }
}
