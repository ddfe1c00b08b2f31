//! Headless Chrome session management via CDP.
//!
//! One [`BrowserSession`] wraps one launched browser process and one page.
//! Sessions are never reused across captures; [`BrowserSession::close`] must
//! run on every exit path so the Chrome process is not leaked.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::types::CaptureError;
use crate::config::CaptureSettings;

/// A launched headless browser with a single page
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch a headless browser sized to the configured viewport and open a
    /// blank page
    pub async fn launch(settings: &CaptureSettings) -> Result<Self, CaptureError> {
        let config = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height)
            .build()
            .map_err(CaptureError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The CDP event stream must be drained for the browser to function
        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// The session's page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate to `url`, waiting at most `timeout` for the load to finish.
    ///
    /// Returns `false` when the deadline passes; the page is left in
    /// whatever state it reached and capture proceeds against it. Navigation
    /// failures other than the timeout propagate.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<bool, CaptureError> {
        let nav = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, nav).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(err)) => Err(err.into()),
            Err(_elapsed) => Ok(false),
        }
    }

    /// Take a full-page PNG screenshot
    pub async fn screenshot_full_page(&self) -> Result<Vec<u8>, CaptureError> {
        let screenshot = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await?;
        Ok(screenshot)
    }

    /// Press and release a key (e.g., "ArrowRight") on the page
    pub async fn press_key(&self, key: &str) -> Result<(), CaptureError> {
        let key_down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key(key.to_string())
            .build()
            .map_err(CaptureError::Browser)?;
        self.page.execute(key_down).await?;

        let key_up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key.to_string())
            .build()
            .map_err(CaptureError::Browser)?;
        self.page.execute(key_up).await?;

        Ok(())
    }

    /// Tear the session down: close the page and browser process, stop the
    /// event drain. Errors during teardown are ignored; the process exits
    /// with the connection either way.
    pub async fn close(mut self) {
        let _ = self.page.close().await;
        let _ = self.browser.close().await;
        self.handler_task.abort();
    }
}
