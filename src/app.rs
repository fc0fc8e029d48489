//! Pipeline Driver
//!
//! Sequences the stages for one run: image selection → line editing →
//! text verification → ground-truth writing → requested training-prep
//! steps. Everything is synchronous and user-driven; an explicit abort in
//! any interactive stage ends the whole run, while stage failures are
//! reported and the remaining requested steps still execute.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::editor::{self, EditorOutcome, LineEditor};
use crate::ocr::OcrAdapter;
use crate::picker;
use crate::session::Session;
use crate::training;
use crate::verify::{self, TextVerifier, VerifyOutcome};
use crate::writer;

/// Which stages this run executes.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Input image; prompted for when absent
    pub image: Option<PathBuf>,
    /// Force the interactive editing stage
    pub line_editor: bool,
    /// Generate the unicharset from written transcriptions
    pub unicharset: bool,
    /// Prepare the LSTMF list file
    pub lstmf: bool,
    /// Print retraining guidance
    pub retrain: bool,
}

impl PipelineOptions {
    /// Editing runs when asked for explicitly, or by default when no
    /// training-prep step was selected.
    pub fn run_editing_stage(&self) -> bool {
        self.line_editor || !(self.unicharset || self.lstmf || self.retrain)
    }
}

enum RunStatus {
    Completed,
    Aborted,
}

pub struct Pipeline {
    config: AppConfig,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(config: AppConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    /// Run the selected stages with the default OCR engine stack.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let mut adapter = OcrAdapter::new(&self.config.ocr);
        self.run_with_adapter(&mut adapter, input, output)
    }

    /// Run the selected stages against an explicit OCR adapter.
    pub fn run_with_adapter<R: BufRead, W: Write>(
        &self,
        adapter: &mut OcrAdapter,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        let Some(image_path) = self.resolve_image(input, output)? else {
            writeln!(output, "No image selected. Exiting.")?;
            return Ok(());
        };

        if self.options.run_editing_stage() {
            if let RunStatus::Aborted = self.run_editing(&image_path, adapter, input, output)? {
                writeln!(output, "Run aborted.")?;
                return Ok(());
            }
        }

        if self.options.unicharset {
            match training::generate_unicharset(
                &self.config.training,
                &self.config.ocr.language,
                &self.config.output.dir,
            ) {
                Ok(path) => writeln!(output, "Unicharset written to {}", path.display())?,
                Err(e) => error!("unicharset generation failed: {e:#}"),
            }
        }

        if self.options.lstmf {
            match training::prepare_lstmf_list(&self.config.training, &self.config.output.dir) {
                Ok(path) => writeln!(output, "Training list written to {}", path.display())?,
                Err(e) => error!("LSTMF list preparation failed: {e:#}"),
            }
        }

        if self.options.retrain {
            training::retrain_guidance(&self.config.training, &self.config.ocr.language);
        }

        info!("pipeline finished");
        Ok(())
    }

    /// Editing workflow: OCR seed → line editor → verifier → writer.
    ///
    /// Stage failures short of an explicit user abort leave the rest of the
    /// run intact.
    fn run_editing<R: BufRead, W: Write>(
        &self,
        image_path: &std::path::Path,
        adapter: &mut OcrAdapter,
        input: &mut R,
        output: &mut W,
    ) -> Result<RunStatus> {
        let mut session = Session::new(image_path);
        info!("processing image {:?}", session.source);

        let image = match image::open(&session.source) {
            Ok(image) => image,
            Err(e) => {
                error!("cannot open {:?}: {e}", session.source);
                return Ok(RunStatus::Completed);
            }
        };

        let seed = adapter.extract_lines(&image).unwrap_or_else(|e| {
            warn!("{e}; starting with an empty line set");
            Vec::new()
        });

        let mut line_editor = LineEditor::new(&image, adapter, seed);
        if let EditorOutcome::Aborted = editor::run_interactive(&mut line_editor, &mut *input, output)? {
            return Ok(RunStatus::Aborted);
        }
        session.lines = line_editor.finish();

        if session.is_empty() {
            writeln!(output, "No line data to verify; skipping remaining stages.")?;
            return Ok(RunStatus::Completed);
        }

        let mut verifier = TextVerifier::new(std::mem::take(&mut session.lines));
        if let VerifyOutcome::Aborted = verify::run_interactive(&mut verifier, &mut *input, output)? {
            return Ok(RunStatus::Aborted);
        }
        session.lines = verifier.finish();

        if session.is_empty() {
            writeln!(output, "No line data left after verification; nothing to write.")?;
            return Ok(RunStatus::Completed);
        }
        info!("{} line(s) confirmed for writing", session.len());

        match writer::write_ground_truth(&session.lines, &session.base_name, &self.config.output.dir)
        {
            Ok(summary) => writeln!(
                output,
                "Wrote {} ground-truth pair(s) ({} failed) to {}",
                summary.written,
                summary.failed,
                self.config.output.dir.display()
            )?,
            Err(e) => error!("ground-truth writing failed: {e:#}"),
        }

        Ok(RunStatus::Completed)
    }

    /// The image named on the command line, or one picked interactively.
    fn resolve_image<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<PathBuf>> {
        match &self.options.image {
            Some(path) => {
                anyhow::ensure!(
                    picker::is_supported_image(path),
                    "unsupported image type: {path:?} (expected JPEG or PNG)"
                );
                std::fs::metadata(path)
                    .with_context(|| format!("cannot access image {path:?}"))?;
                Ok(Some(path.clone()))
            }
            None => picker::prompt_for_image(input, output),
        }
    }
}
