//! Integration test for the describer transport against a local mock
//! endpoint.

use httpmock::prelude::*;

use page_vision::describe::{DescriberConfig, describe_screenshots};

#[test]
fn test_describe_against_mock_endpoint() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/responses")
            .header("authorization", "Bearer sk-test")
            .header("content-type", "application/json")
            .body_includes("input_image")
            .body_includes("data:image/png;base64,");
        then.status(200).json_body(serde_json::json!({
            "output_text": "  This is a plain test page.  ",
        }));
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("page.png");
    std::fs::write(&image_path, b"not-a-real-png").expect("image written");

    let config = DescriberConfig::new("sk-test")
        .endpoint(server.url("/v1/responses"))
        .model("gpt-5-mini");

    let description =
        describe_screenshots(&config, &[image_path]).expect("describe succeeded");

    mock.assert();
    assert_eq!(description, "This is a plain test page.");
}

#[test]
fn test_describe_envelope_fallback_over_the_wire() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(200).json_body(serde_json::json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Fallback text."},
                ]},
            ],
        }));
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("page.png");
    std::fs::write(&image_path, b"bytes").expect("image written");

    let config = DescriberConfig::new("sk-test").endpoint(server.url("/v1/responses"));

    let description =
        describe_screenshots(&config, &[image_path]).expect("describe succeeded");
    assert_eq!(description, "Fallback text.");
}
