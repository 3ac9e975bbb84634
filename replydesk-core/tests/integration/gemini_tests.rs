//! Integration tests for the Gemini assistant client

use replydesk_core::assistant::{
    GeminiAssistant, GeminiConfig, NO_CONTEXT_PLACEHOLDER, ReplyAssistant,
};
use replydesk_core::{AssistantError, Screenshot};
use secrecy::SecretString;

use super::mock_http::{CannedResponse, MockServer};

fn assistant_for(server: &MockServer) -> GeminiAssistant {
    let config = GeminiConfig::new(SecretString::from("g-key".to_string()))
        .with_base_url(format!("{}/v1beta", server.base_url));
    GeminiAssistant::new(config).expect("assistant client")
}

fn text_response(text: &str) -> CannedResponse {
    let body = serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    });
    CannedResponse::json(200, body.to_string())
}

#[test]
fn test_rewrite_posts_prompt_and_trims_answer() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![text_response("\n  Thank you so much!  \n")]).await;
        let assistant = assistant_for(&server);

        let rewritten = assistant.rewrite("thx").await.expect("rewrite succeeds");
        assert_eq!(rewritten, "Thank you so much!");

        let requests = server.finish().await;
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.target,
            "/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(request.header("x-goog-api-key"), Some("g-key"));
        let prompt = request.json_body()["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("text part")
            .to_string();
        assert!(prompt.contains("Text to enhance: \"thx\""));
    });
}

#[test]
fn test_generate_requests_json_and_parses_fields() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![text_response(
            r#"{"title":"Late delivery","text":"We are sorry your order is late."}"#,
        )])
        .await;
        let assistant = assistant_for(&server);

        let generated = assistant.generate("late delivery").await.expect("generate");
        assert_eq!(generated.title, "Late delivery");
        assert_eq!(generated.text, "We are sorry your order is late.");

        let requests = server.finish().await;
        let body = requests[0].json_body();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    });
}

#[test]
fn test_generate_with_non_json_text_is_decode_error() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![text_response("Sure! Here is a template.")]).await;
        let assistant = assistant_for(&server);
        assert!(matches!(
            assistant.generate("refunds").await,
            Err(AssistantError::Decode(_))
        ));
        server.finish().await;
    });
}

#[test]
fn test_suggest_reply_sends_inline_image_and_placeholder() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![text_response("Hi! Your refund is on its way.")]).await;
        let assistant = assistant_for(&server);
        let screenshot = Screenshot::new("image/jpeg", vec![0xff, 0xd8, 0xff]);

        let reply = assistant
            .suggest_reply(&screenshot, "")
            .await
            .expect("suggest succeeds");
        assert_eq!(reply, "Hi! Your refund is on its way.");

        let requests = server.finish().await;
        let parts = &requests[0].json_body()["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/");
        assert!(
            parts[1]["text"]
                .as_str()
                .expect("text part")
                .contains(NO_CONTEXT_PLACEHOLDER)
        );
    });
}

#[test]
fn test_api_error_message_is_surfaced() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![CannedResponse::json(
            400,
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        )])
        .await;
        let assistant = assistant_for(&server);

        match assistant.answer("hello?").await {
            Err(AssistantError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        server.finish().await;
    });
}

#[test]
fn test_blank_answer_is_empty_response() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let server = MockServer::start(vec![text_response("   ")]).await;
        let assistant = assistant_for(&server);
        assert!(matches!(
            assistant.answer("anything?").await,
            Err(AssistantError::EmptyResponse)
        ));
        server.finish().await;
    });
}
