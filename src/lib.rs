//! Page Vision - web page capture with vision model description.
//!
//! This crate provides:
//! - Headless-browser page capture with bounded navigation timeouts
//! - Best-effort bot-challenge (CAPTCHA) detection before screenshotting
//! - Multi-slide capture for horizontally paginated pages
//! - Vision model integration producing plain-language page descriptions
//! - Markdown report assembly tying screenshots and descriptions together
//!
//! # Example
//!
//! ```rust,no_run
//! use page_vision::capture::{CaptureRequest, capture_page};
//! use page_vision::config::CaptureSettings;
//!
//! # async fn demo() -> Result<(), page_vision::capture::CaptureError> {
//! let request = CaptureRequest::new("https://example.com", "screenshots", "example.com");
//! let result = capture_page(&request, &CaptureSettings::defaults()).await?;
//! println!("captured {} screenshot(s)", result.screenshots.len());
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod describe;
pub mod report;
pub mod runner;
pub mod slug;

// Re-export capture types
pub use capture::{
    CaptureError, CaptureRequest, CaptureResult, Diagnostics, ProbeOutcome, capture_page,
};

// Re-export settings
pub use config::Settings;

// Re-export describer
pub use describe::{DESCRIPTION_PROMPT, DescribeError, DescriberConfig, describe_screenshots};

// Re-export report builder
pub use report::{EMPTY_COMMENT_PLACEHOLDER, build_markdown_report, render_report};

// Re-export run orchestration
pub use runner::{CHALLENGE_FALLBACK_TEXT, RunConfig, RunError, RunSummary, run, should_describe};

// Re-export slug derivation
pub use slug::slug_from_url;
