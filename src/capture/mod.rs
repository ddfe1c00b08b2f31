//! Page capture: headless browser navigation, challenge probing, and
//! full-page screenshots.
//!
//! This module provides:
//! - One-shot capture sessions (one browser process per call, never reused)
//! - Bounded navigation with a non-fatal timeout recorded in diagnostics
//! - Best-effort bot-challenge detection before capturing
//! - Multi-slide capture for horizontally paginated pages

pub mod browser;
pub mod challenge;
pub mod types;

pub use browser::BrowserSession;
pub use challenge::{
    CHALLENGE_SELECTORS, CHALLENGE_TEXT_PATTERNS, ProbeOutcome, challenge_detected, probe_page,
};
pub use types::{CaptureError, CaptureRequest, CaptureResult, Diagnostics};

use std::fs;
use std::time::Duration;

use crate::config::CaptureSettings;

/// Key sent to advance a horizontal slide deck
const SLIDE_ADVANCE_KEY: &str = "ArrowRight";

/// Capture a page according to `request`.
///
/// Launches a headless browser, navigates with a bounded timeout (a timeout
/// is recorded in diagnostics, not raised), probes for a bot-verification
/// challenge, then takes `max(1, slides)` full-page screenshots, pressing
/// ArrowRight between slides. Screenshots are written under
/// `request.screenshots_dir`, which is created if absent.
///
/// The browser process is closed before this function returns, on both the
/// success and the error path.
pub async fn capture_page(
    request: &CaptureRequest,
    settings: &CaptureSettings,
) -> Result<CaptureResult, CaptureError> {
    fs::create_dir_all(&request.screenshots_dir)?;

    let session = BrowserSession::launch(settings).await?;
    let outcome = drive(&session, request, settings).await;
    session.close().await;
    outcome
}

async fn drive(
    session: &BrowserSession,
    request: &CaptureRequest,
    settings: &CaptureSettings,
) -> Result<CaptureResult, CaptureError> {
    let load_ok = session
        .navigate(&request.url, Duration::from_secs(settings.nav_timeout))
        .await?;
    if !load_ok {
        eprintln!(
            "Warning: page did not finish loading within {}s; capturing current state",
            settings.nav_timeout
        );
    }

    // Fixed dwell time for client-side rendering; see config::DEFAULT_SETTLE_DELAY_MS
    tokio::time::sleep(Duration::from_millis(settings.settle_delay_ms)).await;

    let outcomes = probe_page(session.page()).await;
    let captcha_detected = challenge_detected(&outcomes);

    let total = request.effective_slides();
    let mut screenshots = Vec::with_capacity(total as usize);

    for index in 1..=total {
        let image_data = session.screenshot_full_page().await?;
        let path = request.slide_path(index);
        fs::write(&path, &image_data)?;
        screenshots.push(path);

        if index < total {
            // Best-effort: the page may not respond to slide navigation
            let _ = session.press_key(SLIDE_ADVANCE_KEY).await;
            tokio::time::sleep(Duration::from_millis(settings.slide_delay_ms)).await;
        }
    }

    Ok(CaptureResult {
        screenshots,
        diagnostics: Diagnostics {
            load_ok,
            captcha_detected,
        },
    })
}
