//! Core types for page capture.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single page-capture request.
///
/// Immutable input to [`capture_page`](crate::capture::capture_page); the slug
/// must match the one the report builder derives so screenshots and report
/// line up on disk.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Target page URL
    pub url: String,
    /// Directory screenshots are written to (created if absent)
    pub screenshots_dir: PathBuf,
    /// Filename slug shared with the report builder
    pub slug: String,
    /// Requested horizontal slide count; values below 1 behave as 1
    pub slides: i32,
}

impl CaptureRequest {
    /// Create a request for a single-slide capture
    pub fn new(
        url: impl Into<String>,
        screenshots_dir: impl Into<PathBuf>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            screenshots_dir: screenshots_dir.into(),
            slug: slug.into(),
            slides: 1,
        }
    }

    /// Set the horizontal slide count
    pub fn slides(mut self, slides: i32) -> Self {
        self.slides = slides;
        self
    }

    /// Slide count actually captured: the request value clamped to >= 1
    pub fn effective_slides(&self) -> u32 {
        self.slides.max(1) as u32
    }

    /// Path for the screenshot of the given 1-indexed slide.
    ///
    /// A single-slide capture is named `{slug}.png`; multi-slide captures are
    /// `{slug}_slide_{n}.png`.
    pub fn slide_path(&self, index: u32) -> PathBuf {
        let filename = if self.effective_slides() == 1 {
            format!("{}.png", self.slug)
        } else {
            format!("{}_slide_{}.png", self.slug, index)
        };
        self.screenshots_dir.join(filename)
    }
}

/// Anomalies observed while loading and probing the page
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Whether navigation finished within the timeout
    pub load_ok: bool,
    /// Whether a bot-verification challenge marker matched
    pub captcha_detected: bool,
}

/// Result of a completed capture.
///
/// `screenshots` is ordered by capture order and contains exactly
/// `max(1, slides)` paths when capture completes without a fatal error.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Written screenshot files, in capture order
    pub screenshots: Vec<PathBuf>,
    /// Load/challenge diagnostics
    pub diagnostics: Diagnostics,
}

/// Error types for capture operations
#[derive(Debug)]
pub enum CaptureError {
    /// Browser launch or automation failure
    Browser(String),
    /// I/O error writing screenshots or creating directories
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Browser(msg) => write!(f, "Browser error: {}", msg),
            CaptureError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Browser(_) => None,
            CaptureError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}

impl From<chromiumoxide::error::CdpError> for CaptureError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CaptureError::Browser(err.to_string())
    }
}
