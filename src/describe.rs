//! Vision model client producing plain-language page descriptions.
//!
//! Sends one synchronous request per run to an OpenAI-compatible Responses
//! endpoint: a fixed instruction prompt followed by every captured screenshot
//! as a base64 data URL. No retry, no backoff; service errors propagate.
//!
//! All settings, including the API credential, are passed in via
//! [`DescriberConfig`]; nothing here reads the environment.

use base64::Engine;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::DescriberSettings;

/// Result type for describe operations
pub type DescribeResult<T> = Result<T, DescribeError>;

/// Errors that can occur while obtaining a description
#[derive(Debug)]
pub enum DescribeError {
    /// The API credential was not configured
    MissingApiKey,
    /// No images were supplied
    EmptyInput,
    /// Failed to reach the model endpoint
    ConnectionFailed(String),
    /// Response could not be decoded or contained no text
    InvalidResponse(String),
    /// IO error reading images or talking to the transport
    Io(std::io::Error),
}

impl std::fmt::Display for DescribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescribeError::MissingApiKey => {
                write!(f, "{} environment variable is not set", crate::config::ENV_API_KEY)
            }
            DescribeError::EmptyInput => write!(f, "Screenshot list is empty"),
            DescribeError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            DescribeError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            DescribeError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for DescribeError {}

impl From<std::io::Error> for DescribeError {
    fn from(err: std::io::Error) -> Self {
        DescribeError::Io(err)
    }
}

/// Fixed instruction prompt sent with the screenshots.
///
/// Written for simple, non-technical output; the numbered structure keeps the
/// model's answer renderable as-is inside the Markdown report.
pub const DESCRIPTION_PROMPT: &str = "\
You are describing a web page based on its screenshots. Write in plain \
language that a child or an elderly person could understand.

You may receive several screenshots of the same page (for example, different \
slides or screens). Take all of them into account.

Structure your answer (use Markdown):

1. One or two sentences: what this site is and who it is for.
2. The 1-3 main actions a user can take on this page.
3. The major blocks of the page in real viewing order (top to bottom, or \
left to right if it is a slider).
4. An explanation of the page in 5-10 very simple sentences, without \
technical terms.

Do not add anything else, and do not write about yourself or the model.";

/// Configuration for the vision model client
#[derive(Debug, Clone)]
pub struct DescriberConfig {
    /// API endpoint URL
    pub endpoint: String,
    /// Model name to use
    pub model: String,
    /// API credential
    pub api_key: String,
    /// Maximum tokens in the description response
    pub max_output_tokens: u32,
    /// Timeout for the initial connection (seconds)
    pub connect_timeout: u64,
}

impl DescriberConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = DescriberSettings::defaults();
        Self {
            endpoint: defaults.endpoint,
            model: defaults.model,
            api_key: api_key.into(),
            max_output_tokens: defaults.max_output_tokens,
            connect_timeout: defaults.connect_timeout,
        }
    }

    /// Build a config from settings; fails when no credential is present
    pub fn from_settings(settings: &DescriberSettings) -> DescribeResult<Self> {
        let api_key = settings.api_key.clone().ok_or(DescribeError::MissingApiKey)?;
        Ok(Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            max_output_tokens: settings.max_output_tokens,
            connect_timeout: settings.connect_timeout,
        })
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Describe one or more screenshots of a page.
///
/// Reads every image from disk, sends a single request, and returns the
/// model's text, whitespace-trimmed. The image list is validated before any
/// file or network work.
pub fn describe_screenshots(
    config: &DescriberConfig,
    image_paths: &[PathBuf],
) -> DescribeResult<String> {
    if image_paths.is_empty() {
        return Err(DescribeError::EmptyInput);
    }

    let mut images = Vec::with_capacity(image_paths.len());
    for path in image_paths {
        images.push(std::fs::read(path)?);
    }

    let request = build_request(config, &images);
    let response = send_request(config, &request)?;
    extract_text(&response)
        .ok_or_else(|| DescribeError::InvalidResponse("no text content in model response".to_string()))
}

/// Encode PNG bytes as an embeddable data URL
pub fn encode_image_data_url(image_data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image_data);
    format!("data:image/png;base64,{}", encoded)
}

/// Assemble the request body: instruction text first, then every image in
/// capture order
pub fn build_request(config: &DescriberConfig, images: &[Vec<u8>]) -> serde_json::Value {
    let mut content = vec![serde_json::json!({
        "type": "input_text",
        "text": DESCRIPTION_PROMPT,
    })];

    for image in images {
        content.push(serde_json::json!({
            "type": "input_image",
            "image_url": encode_image_data_url(image),
        }));
    }

    serde_json::json!({
        "model": config.model,
        "max_output_tokens": config.max_output_tokens,
        "input": [{
            "role": "user",
            "content": content,
        }],
    })
}

/// Send one synchronous request via curl, returning the parsed JSON body
fn send_request(
    config: &DescriberConfig,
    request: &serde_json::Value,
) -> DescribeResult<serde_json::Value> {
    let request_json = serde_json::to_string(request)
        .map_err(|e| DescribeError::InvalidResponse(e.to_string()))?;

    // Body goes through stdin: data URLs are far too large for an argv entry
    let mut child = Command::new("curl")
        .args([
            "-s",
            "-X", "POST",
            &config.endpoint,
            "-H", "Content-Type: application/json",
            "-H", &format!("Authorization: Bearer {}", config.api_key),
            "--data-binary", "@-",
            "--connect-timeout", &config.connect_timeout.to_string(),
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(request_json.as_bytes())?;
    }

    let output = child.wait_with_output()?;

    if !output.status.success() {
        return Err(DescribeError::ConnectionFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| DescribeError::InvalidResponse(e.to_string()))
}

// ============================================================================
// Response decoding
// ============================================================================

/// Response envelope: the convenience `output_text` field when the service
/// provides it, else the structured `output` list
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentSegment>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentSegment {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// Pull the description text out of a response body.
///
/// Primary path: the top-level `output_text` field. Fallback: concatenate
/// every text-typed segment of every message in the `output` list. Returns
/// `None` when neither path yields text.
fn extract_text(response: &serde_json::Value) -> Option<String> {
    let envelope: ResponseEnvelope = serde_json::from_value(response.clone()).ok()?;

    if let Some(text) = envelope.output_text {
        return Some(text.trim().to_string());
    }

    let mut parts = Vec::new();
    for item in &envelope.output {
        if let OutputItem::Message { content } = item {
            for segment in content {
                if let ContentSegment::OutputText { text } = segment {
                    parts.push(text.as_str());
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n").trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_structure() {
        assert!(DESCRIPTION_PROMPT.contains("screenshots"));
        assert!(DESCRIPTION_PROMPT.contains("1-3 main actions"));
        assert!(DESCRIPTION_PROMPT.contains("5-10"));
    }

    #[test]
    fn test_config_builder() {
        let config = DescriberConfig::new("sk-test")
            .endpoint("http://localhost:8080/v1/responses")
            .model("gpt-5-mini")
            .max_output_tokens(200);

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.endpoint, "http://localhost:8080/v1/responses");
        assert_eq!(config.model, "gpt-5-mini");
        assert_eq!(config.max_output_tokens, 200);
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = DescriberSettings::defaults();
        assert!(matches!(
            DescriberConfig::from_settings(&settings),
            Err(DescribeError::MissingApiKey)
        ));

        let with_key = DescriberSettings {
            api_key: Some("sk-test".to_string()),
            ..DescriberSettings::defaults()
        };
        assert!(DescriberConfig::from_settings(&with_key).is_ok());
    }

    #[test]
    fn test_empty_input_rejected_before_io() {
        let config = DescriberConfig::new("sk-test");
        assert!(matches!(
            describe_screenshots(&config, &[]),
            Err(DescribeError::EmptyInput)
        ));
    }

    #[test]
    fn test_encode_image_data_url() {
        let url = encode_image_data_url(b"png-bytes");
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_build_request_image_order() {
        let config = DescriberConfig::new("sk-test").model("gpt-5");
        let request = build_request(&config, &[b"first".to_vec(), b"second".to_vec()]);

        let content = &request["input"][0]["content"];
        assert_eq!(content[0]["type"], "input_text");
        assert_eq!(content[1]["type"], "input_image");
        assert_eq!(content[2]["type"], "input_image");
        assert_eq!(content[1]["image_url"], encode_image_data_url(b"first"));
        assert_eq!(content[2]["image_url"], encode_image_data_url(b"second"));
        assert_eq!(request["model"], "gpt-5");
    }

    #[test]
    fn test_extract_text_primary_field() {
        let response = serde_json::json!({
            "output_text": "  A simple shop page.  ",
        });
        assert_eq!(extract_text(&response).as_deref(), Some("A simple shop page."));
    }

    #[test]
    fn test_extract_text_envelope_fallback() {
        let response = serde_json::json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "First part."},
                    {"type": "refusal", "refusal": "n/a"},
                    {"type": "output_text", "text": "Second part."},
                ]},
            ],
        });
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("First part.\nSecond part.")
        );
    }

    #[test]
    fn test_extract_text_no_content() {
        let response = serde_json::json!({
            "output": [{"type": "reasoning", "summary": []}],
        });
        assert_eq!(extract_text(&response), None);
        assert_eq!(extract_text(&serde_json::json!({})), None);
    }
}
