//! Image selection
//!
//! Console prompt for the input image path. An empty answer (or end of
//! input) aborts the run cleanly.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Accepted input formats.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// True for the raster formats the pipeline accepts.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Prompt until the user names an existing JPEG/PNG file or gives up.
///
/// Returns `None` when the user answers with an empty line or input ends.
pub fn prompt_for_image<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<PathBuf>> {
    loop {
        write!(output, "Image file (JPEG/PNG), empty line to quit: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        let path = PathBuf::from(answer);
        if !is_supported_image(&path) {
            writeln!(output, "  unsupported file type (expected .jpg, .jpeg or .png)")?;
            continue;
        }
        if !path.is_file() {
            writeln!(output, "  no such file: {}", path.display())?;
            continue;
        }

        return Ok(Some(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("scan.png")));
        assert!(is_supported_image(Path::new("scan.JPG")));
        assert!(is_supported_image(Path::new("scan.jpeg")));
        assert!(!is_supported_image(Path::new("scan.tif")));
        assert!(!is_supported_image(Path::new("scan")));
    }

    #[test]
    fn test_empty_answer_aborts() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert!(prompt_for_image(&mut input, &mut output)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_end_of_input_aborts() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_for_image(&mut input, &mut output)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_reprompts_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let img_path = dir.path().join("scan.png");
        std::fs::write(&img_path, "fake png").unwrap();

        let script = format!(
            "notes.txt\n{}\n{}\n",
            dir.path().join("missing.png").display(),
            img_path.display()
        );
        let mut input = Cursor::new(script);
        let mut output = Vec::new();

        let picked = prompt_for_image(&mut input, &mut output).unwrap();
        assert_eq!(picked, Some(img_path));

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("unsupported file type"));
        assert!(printed.contains("no such file"));
    }
}
