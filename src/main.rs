//! tessgt - Line-level ground-truth preparation for Tesseract LSTM training
//!
//! Runs OCR over a page image to propose text-line boxes and
//! transcriptions, lets the user correct both interactively, and writes the
//! corrected `.tif`/`.gt.txt` pairs Tesseract's training tools consume.

mod app;
mod config;
mod editor;
mod ocr;
mod picker;
mod session;
mod training;
mod verify;
mod writer;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::app::{Pipeline, PipelineOptions};
use crate::config::AppConfig;

/// tessgt - Tesseract ground-truth preparation
#[derive(Parser, Debug)]
#[command(name = "tessgt")]
#[command(about = "Prepare line-level ground truth (.tif/.gt.txt pairs) for Tesseract training")]
struct Args {
    /// Input image (JPEG/PNG); prompted for interactively when omitted
    image: Option<PathBuf>,

    /// Tesseract language/model identifier (overrides the config file)
    #[arg(short, long)]
    language: Option<String>,

    /// Run the interactive line editor (default when no other step is given)
    #[arg(short = 'b', long)]
    line_editor: bool,

    /// Generate the unicharset from the written .gt.txt files
    #[arg(short = 'n', long)]
    unicharset: bool,

    /// Prepare the LSTMF list file from the written .tif/.gt.txt pairs
    #[arg(short = 'f', long)]
    lstmf: bool,

    /// Show retraining guidance for the prepared data
    #[arg(short = 'r', long)]
    retrain: bool,

    /// Output directory for the .tif/.gt.txt pairs (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("tessgt starting...");

    let mut config = load_or_create_config();
    if let Some(language) = args.language {
        config.ocr.language = language;
    }
    if let Some(output_dir) = args.output_dir {
        config.output.dir = output_dir;
    }

    let options = PipelineOptions {
        image: args.image,
        line_editor: args.line_editor,
        unicharset: args.unicharset,
        lstmf: args.lstmf,
        retrain: args.retrain,
    };

    let pipeline = Pipeline::new(config, options);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    pipeline.run(&mut input, &mut output)
}

/// Load configuration from file or create default
fn load_or_create_config() -> AppConfig {
    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
