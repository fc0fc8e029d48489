//! Training-prep steps
//!
//! Post-editing utilities that shape the written ground-truth pairs into the
//! inputs Tesseract's training tools expect: unicharset extraction (by
//! shelling out to `unicharset_extractor`) and the LSTMF list file consumed
//! by tesstrain. Invocations are synchronous with no timeout; a missing
//! binary is reported, never a panic.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::config::TrainingSettings;

/// Name of the list file consumed by tesstrain.
pub const LSTMF_LIST_FILE: &str = "all_gt_files.txt";

/// All `.gt.txt` files in the output directory, sorted by name.
pub fn collect_gt_texts(gt_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(gt_dir)
        .with_context(|| format!("failed to read ground-truth directory {gt_dir:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().ends_with(".gt.txt"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// All `.tif` crops in the output directory, sorted by name.
pub fn collect_gt_images(gt_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(gt_dir)
        .with_context(|| format!("failed to read ground-truth directory {gt_dir:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "tif").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

/// Argument list for the unicharset tool, kept separate for testability.
pub fn unicharset_args(output: &Path, gt_files: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--output_unicharset".into(), output.into()];
    args.extend(gt_files.iter().map(|f| f.clone().into_os_string()));
    args
}

/// Run `unicharset_extractor` over every written `.gt.txt` file, producing
/// `<tessdata>/<language>.unicharset`.
pub fn generate_unicharset(
    settings: &TrainingSettings,
    language: &str,
    gt_dir: &Path,
) -> Result<PathBuf> {
    let gt_files = collect_gt_texts(gt_dir)?;
    if gt_files.is_empty() {
        bail!("no .gt.txt files found in {gt_dir:?}; run the line editor first");
    }

    fs::create_dir_all(&settings.tessdata_dir)
        .with_context(|| format!("failed to create {:?}", settings.tessdata_dir))?;
    let output_path = settings.tessdata_dir.join(format!("{language}.unicharset"));

    let tool = &settings.unicharset_tool;
    info!(
        "running {tool} over {} ground-truth file(s) -> {output_path:?}",
        gt_files.len()
    );

    let output = match Command::new(tool)
        .args(unicharset_args(&output_path, &gt_files))
        .output()
    {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            bail!("'{tool}' not found in PATH; install the Tesseract training tools");
        }
        Err(e) => return Err(e).with_context(|| format!("failed to run '{tool}'")),
    };

    if !output.status.success() {
        bail!(
            "'{tool}' exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    info!("unicharset generated: {output_path:?}");
    Ok(output_path)
}

/// Write the tesstrain list file: one base path per `.tif` crop that has a
/// matching `.gt.txt` transcription.
///
/// Actual LSTMF generation is tesstrain's job; this only prepares its input
/// listing.
pub fn prepare_lstmf_list(settings: &TrainingSettings, gt_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(&settings.lstmf_dir)
        .with_context(|| format!("failed to create {:?}", settings.lstmf_dir))?;

    let mut listed = 0usize;
    let mut contents = String::new();
    for tif in collect_gt_images(gt_dir)? {
        let gt_txt = tif.with_extension("gt.txt");
        if gt_txt.exists() {
            contents.push_str(&tif.with_extension("").to_string_lossy());
            contents.push('\n');
            listed += 1;
        } else {
            warn!("{tif:?} has no matching .gt.txt transcription, skipping");
        }
    }

    let list_path = settings.lstmf_dir.join(LSTMF_LIST_FILE);
    fs::write(&list_path, contents)
        .with_context(|| format!("failed to write {list_path:?}"))?;

    info!("listed {listed} training pair(s) in {list_path:?}");
    info!("LSTMF generation itself is handled by tesstrain ('make training')");
    Ok(list_path)
}

/// Point the user at the artifacts the actual retraining run needs.
///
/// Retraining runs through Tesseract's `lstmtraining`/tesstrain, not through
/// this tool; only the data preparation happens here.
pub fn retrain_guidance(settings: &TrainingSettings, language: &str) {
    info!(
        "retraining uses Tesseract's lstmtraining or tesstrain; this tool only prepares the data"
    );
    info!(
        "expected unicharset: {:?}",
        settings.tessdata_dir.join(format!("{language}.unicharset"))
    );
    info!(
        "expected list file: {:?}",
        settings.lstmf_dir.join(LSTMF_LIST_FILE)
    );
}
