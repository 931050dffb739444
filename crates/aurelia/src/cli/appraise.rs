//! The `aurelia appraise` command.

use anyhow::Context;
use aurelia_core::{Aurelia, ImageInput, ARCHIVES_UNAVAILABLE};
use clap::Args;
use console::Style;
use std::io::Write;
use std::path::PathBuf;

use super::create_spinner;

const REPORT_HEADING: &str = "Appraisal Report";

const DISCLAIMER: &str = "Disclaimer: This is an AI-generated estimate for informational purposes \
only and does not constitute a certified professional appraisal.";

/// Arguments for the `appraise` command.
#[derive(Args, Debug)]
pub struct AppraiseArgs {
    /// Image file to appraise (jpg, png, webp, gif)
    pub image: String,

    /// Treat IMAGE as a `data:<mime>;base64,...` URL instead of a path
    #[arg(long)]
    pub data_url: bool,
}

/// Execute the appraise command.
pub async fn execute(args: AppraiseArgs, aurelia: &Aurelia) -> anyhow::Result<()> {
    let image = load_image(&args)?;
    tracing::debug!(media_type = %image.media_type, "Loaded image for appraisal");

    let appraiser = match aurelia.appraiser() {
        Ok(appraiser) => appraiser,
        Err(e) => {
            tracing::warn!("Appraiser unavailable: {e}");
            anyhow::bail!("{ARCHIVES_UNAVAILABLE}\n  {e}");
        }
    };

    let spinner = create_spinner("Appraising...");
    let report = appraiser.appraise_image(image).await;
    spinner.finish_and_clear();

    write_report(&report, &mut std::io::stdout(), &mut std::io::stderr())?;
    Ok(())
}

/// Write the report to `out`, framed by the heading and disclaimer on `err`.
///
/// Only the report itself goes to `out`, so it can be piped to a file.
fn write_report(report: &str, out: &mut impl Write, err: &mut impl Write) -> std::io::Result<()> {
    let heading = Style::new().for_stderr().yellow().bold();
    let dim = Style::new().for_stderr().dim();

    writeln!(err)?;
    writeln!(err, "  {}", heading.apply_to(REPORT_HEADING))?;
    writeln!(err, "  {}", dim.apply_to("─".repeat(REPORT_HEADING.len())))?;
    writeln!(err)?;
    err.flush()?;

    writeln!(out, "{report}")?;
    out.flush()?;

    writeln!(err)?;
    writeln!(err, "  {}", dim.apply_to(DISCLAIMER))?;
    Ok(())
}

fn load_image(args: &AppraiseArgs) -> anyhow::Result<ImageInput> {
    if args.data_url {
        return ImageInput::from_data_url(&args.image)
            .context("Expected a data URL of the form data:<mime>;base64,<payload>");
    }

    let path = PathBuf::from(shellexpand::tilde(&args.image).as_ref());
    if !path.exists() {
        anyhow::bail!("Image not found: {}", path.display());
    }
    ImageInput::from_path(&path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(image: &str, data_url: bool) -> AppraiseArgs {
        AppraiseArgs {
            image: image.to_string(),
            data_url,
        }
    }

    #[test]
    fn test_report_goes_to_stdout_with_frame_on_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_report("## Era\nLate Victorian", &mut out, &mut err).unwrap();

        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert_eq!(out, "## Era\nLate Victorian\n");
        assert!(err.contains("Appraisal Report"));
        assert!(err.contains("does not constitute a certified professional appraisal"));
        assert!(!err.contains("Late Victorian"));
    }

    #[test]
    fn test_fallback_text_is_framed_too() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_report(aurelia_core::APPRAISAL_FALLBACKS.failed, &mut out, &mut err).unwrap();

        assert!(String::from_utf8(out)
            .unwrap()
            .starts_with("Sorry, I encountered an error"));
        assert!(String::from_utf8(err).unwrap().contains("Disclaimer:"));
    }

    #[test]
    fn test_load_image_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teapot.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let image = load_image(&args(path.to_str().unwrap(), false)).unwrap();
        assert_eq!(image.media_type, "image/png");
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image(&args("/nonexistent/teapot.jpg", false)).unwrap_err();
        assert!(err.to_string().contains("Image not found"));
    }

    #[test]
    fn test_load_image_from_data_url() {
        let image = load_image(&args("data:image/jpeg;base64,QUJD", true)).unwrap();
        assert_eq!(image.media_type, "image/jpeg");
        assert_eq!(image.data, "QUJD");
    }

    #[test]
    fn test_load_image_rejects_malformed_data_url() {
        assert!(load_image(&args("QUJD", true)).is_err());
    }
}
