use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use page_vision::config::{self, Settings};
use page_vision::runner::{RunConfig, run};

/// Page Vision - web page capture with vision model description
#[derive(Parser, Debug)]
#[command(
    name = "page-vision",
    about = "Capture a web page, describe it with a vision model, and build a Markdown report",
    after_help = "ENVIRONMENT VARIABLES:\n\
        OPENAI_API_KEY               API credential for the vision model (required)\n\
        PAGE_VISION_ENDPOINT         Vision model API endpoint URL\n\
        PAGE_VISION_MODEL            Model name\n\
        PAGE_VISION_NAV_TIMEOUT      Page navigation timeout (seconds)\n\
        PAGE_VISION_SETTLE_DELAY_MS  Post-navigation settle delay (ms)\n\
        PAGE_VISION_SLIDE_DELAY_MS   Delay after a slide advance (ms)\n\
        PAGE_VISION_VIEWPORT         Browser viewport as WxH\n\n\
        Variables may also be supplied via a local .env file."
)]
struct Args {
    /// URL of the page to analyze
    url: String,

    /// Directory for Markdown reports
    #[arg(long, default_value = config::DEFAULT_REPORTS_DIR)]
    output_dir: PathBuf,

    /// Directory for captured screenshots
    #[arg(long, default_value = config::DEFAULT_SCREENSHOTS_DIR)]
    screenshots_dir: PathBuf,

    /// Short author comment for the report (placeholder used when omitted)
    #[arg(long)]
    comment: Option<String>,

    /// Fail instead of using the placeholder when no comment is given
    #[arg(long)]
    require_comment: bool,

    /// Vision model used to analyze the screenshots
    #[arg(long, env = "PAGE_VISION_MODEL", default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Number of horizontal slides to capture (e.g., for slide-deck sites)
    #[arg(long, default_value = "1")]
    horizontal_slides: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.require_comment
        && args.comment.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err("--require-comment is set but no comment was provided".into());
    }

    let mut settings = Settings::from_env();
    settings.describer.model = args.model;
    if settings.describer.api_key.is_none() {
        return Err(format!("{} environment variable is not set", config::ENV_API_KEY).into());
    }

    let run_config = RunConfig {
        url: args.url,
        reports_dir: args.output_dir,
        screenshots_dir: args.screenshots_dir,
        comment: args.comment,
        slides: args.horizontal_slides,
        settings,
    };

    let summary = run(&run_config).await?;

    println!("Done.");
    println!("Report:      {}", summary.report_path.display());
    let screenshots: Vec<String> = summary
        .screenshot_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("Screenshots: {}", screenshots.join(", "));

    Ok(())
}
