//! Run orchestration: capture, describe (or fallback), report.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::{CaptureError, CaptureRequest, Diagnostics, capture_page};
use crate::config::Settings;
use crate::describe::{DescribeError, DescriberConfig, describe_screenshots};
use crate::report::build_markdown_report;
use crate::slug::slug_from_url;

/// Fixed text substituted for the model description when a verification
/// challenge blocks the page. Used verbatim in the report.
pub const CHALLENGE_FALLBACK_TEXT: &str = "\
The page content could not be fully analyzed.

Reason: the site presents a bot-verification challenge (CAPTCHA / \"I am not \
a robot\") that blocks automated access to the content. The screenshot(s) in \
this report show the verification page, not the site's actual content.";

/// Configuration for one complete run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Target page URL
    pub url: String,
    /// Directory for the Markdown report
    pub reports_dir: PathBuf,
    /// Directory for captured screenshots
    pub screenshots_dir: PathBuf,
    /// Optional author comment for the report
    pub comment: Option<String>,
    /// Horizontal slide count (values below 1 behave as 1)
    pub slides: i32,
    /// Capture and describer settings
    pub settings: Settings,
}

/// Result of a complete run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Path to the written report
    pub report_path: PathBuf,

    /// All written screenshots, in capture order
    pub screenshot_paths: Vec<PathBuf>,

    /// Capture diagnostics
    pub diagnostics: Diagnostics,
}

/// Result type for run operations
pub type RunResult<T> = Result<T, RunError>;

/// Errors from any phase of a run
#[derive(Debug)]
pub enum RunError {
    /// Page capture failed
    Capture(CaptureError),
    /// Model description failed
    Describe(DescribeError),
    /// Report could not be written
    Report(std::io::Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Capture(err) => write!(f, "Capture error: {}", err),
            RunError::Describe(err) => write!(f, "Describe error: {}", err),
            RunError::Report(err) => write!(f, "Report error: {}", err),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Capture(err) => Some(err),
            RunError::Describe(err) => Some(err),
            RunError::Report(err) => Some(err),
        }
    }
}

impl From<CaptureError> for RunError {
    fn from(err: CaptureError) -> Self {
        RunError::Capture(err)
    }
}

impl From<DescribeError> for RunError {
    fn from(err: DescribeError) -> Self {
        RunError::Describe(err)
    }
}

impl From<std::io::Error> for RunError {
    fn from(err: std::io::Error) -> Self {
        RunError::Report(err)
    }
}

/// Whether the model should be consulted for this capture
pub fn should_describe(diagnostics: &Diagnostics) -> bool {
    !diagnostics.captcha_detected
}

/// Run one capture → describe → report cycle.
///
/// Emits progress for each of the three phases on stdout. When a challenge
/// was detected, the model is never called and
/// [`CHALLENGE_FALLBACK_TEXT`] stands in for the description. The first
/// screenshot is always the report's representative image.
pub async fn run(config: &RunConfig) -> RunResult<RunSummary> {
    let slug = slug_from_url(&config.url);

    println!(
        "[1/3] Capturing {} -> {}/{}*.png",
        config.url,
        config.screenshots_dir.display(),
        slug
    );

    let request = CaptureRequest::new(&config.url, &config.screenshots_dir, &slug)
        .slides(config.slides);
    let capture = capture_page(&request, &config.settings.capture).await?;

    let main_screenshot = capture
        .screenshots
        .first()
        .ok_or_else(|| RunError::Capture(CaptureError::Browser("capture produced no screenshots".to_string())))?;
    if let Ok((width, height)) = image::image_dimensions(main_screenshot) {
        println!("  Size: {}x{}", width, height);
    }

    let description = if should_describe(&capture.diagnostics) {
        println!(
            "[2/3] Sending {} screenshot(s) to {}",
            capture.screenshots.len(),
            config.settings.describer.model
        );
        let describer = DescriberConfig::from_settings(&config.settings.describer)?;
        describe_screenshots(&describer, &capture.screenshots)?
    } else {
        println!("[2/3] Verification challenge detected; skipping model description");
        CHALLENGE_FALLBACK_TEXT.to_string()
    };

    println!("[3/3] Writing Markdown report to {}", config.reports_dir.display());
    let report_path = build_markdown_report(
        &config.url,
        main_screenshot,
        &description,
        config.comment.as_deref(),
        &config.reports_dir,
    )?;

    Ok(RunSummary {
        report_path,
        screenshot_paths: capture.screenshots.clone(),
        diagnostics: capture.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_describe() {
        let clean = Diagnostics { load_ok: true, captcha_detected: false };
        let blocked = Diagnostics { load_ok: true, captcha_detected: true };
        assert!(should_describe(&clean));
        assert!(!should_describe(&blocked));
    }

    #[test]
    fn test_partial_load_still_describes() {
        let partial = Diagnostics { load_ok: false, captcha_detected: false };
        assert!(should_describe(&partial));
    }

    #[test]
    fn test_fallback_text_names_the_cause() {
        assert!(CHALLENGE_FALLBACK_TEXT.contains("CAPTCHA"));
        assert!(CHALLENGE_FALLBACK_TEXT.contains("verification page"));
    }
}
