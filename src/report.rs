//! Markdown report assembly.
//!
//! One report per capture+describe cycle: `{slug}.md` in the reports
//! directory, embedding the representative screenshot through a relative
//! link so report and screenshots stay linked when moved together.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::slug::slug_from_url;

/// Text used for the author-comment section when no comment was supplied
pub const EMPTY_COMMENT_PLACEHOLDER: &str = "No comment has been added yet.";

/// Render the report body.
///
/// Pure; the caller supplies the already-relativized image path (with `/`
/// separators) and the generation time.
pub fn render_report(
    url: &str,
    image_link: &str,
    description: &str,
    comment: Option<&str>,
    generated_at: DateTime<Utc>,
) -> String {
    let comment_text = comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(EMPTY_COMMENT_PLACEHOLDER);

    format!(
        "# Page report for {url}\n\
         \n\
         ![Page screenshot]({image_link})\n\
         \n\
         ## Description\n\
         \n\
         {description}\n\
         \n\
         ## Author comment\n\
         \n\
         {comment_text}\n\
         \n\
         ---\n\
         _Generated: {timestamp}_\n",
        url = url,
        image_link = image_link,
        description = description.trim(),
        comment_text = comment_text,
        timestamp = generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// Write the Markdown report for one capture+describe cycle.
///
/// Derives the same slug as the capturer, creates `reports_dir` if absent,
/// and overwrites any existing report for that slug. Returns the report path.
pub fn build_markdown_report(
    url: &str,
    screenshot_path: &Path,
    description: &str,
    comment: Option<&str>,
    reports_dir: &Path,
) -> io::Result<PathBuf> {
    fs::create_dir_all(reports_dir)?;

    let slug = slug_from_url(url);
    let report_path = reports_dir.join(format!("{}.md", slug));

    let relative_screenshot = pathdiff::diff_paths(screenshot_path, reports_dir)
        .unwrap_or_else(|| screenshot_path.to_path_buf());
    let image_link = posix_path(&relative_screenshot);

    let content = render_report(url, &image_link, description, comment, Utc::now());
    fs::write(&report_path, content)?;

    Ok(report_path)
}

/// Join path components with `/` so the link renders on every platform
fn posix_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
