use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str) -> OpenRouterClient {
    let config = ChatConfig { api_key: None, base_url: base_url.to_owned(), model: "test/model".into() };
    OpenRouterClient::new("sk-or-test".into(), &config, UpstreamTimeouts::default()).unwrap()
}

const OPTIONS: ChatOptions = ChatOptions { max_tokens: 150, temperature: 0.7 };

// ===== message building =====

#[test]
fn cc_messages_put_system_first() {
    let convo = vec![Message::new("user", "hi"), Message::new("assistant", "hello")];
    let built = build_chat_completions_messages("be nice", &convo);
    assert_eq!(
        built,
        vec![
            CcMessage { role: "system", content: "be nice" },
            CcMessage { role: "user", content: "hi" },
            CcMessage { role: "assistant", content: "hello" },
        ]
    );
}

#[test]
fn cc_messages_skip_blank_system() {
    let convo = vec![Message::new("user", "hi")];
    let built = build_chat_completions_messages("  ", &convo);
    assert_eq!(built, vec![CcMessage { role: "user", content: "hi" }]);
}

// ===== response parsing =====

#[test]
fn cc_parse_text_response() {
    let json = json!({
        "model": "meta-llama/llama-4-scout:free",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Hello!" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.content, "Hello!");
    assert_eq!(resp.model, "meta-llama/llama-4-scout:free");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_null_content_is_empty() {
    let json = json!({
        "choices": [{ "message": { "role": "assistant", "content": null } }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_missing_choices() {
    let json = json!({ "model": "x", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn cc_parse_invalid_json() {
    assert!(matches!(parse_chat_completions_response("<html>"), Err(LlmError::ApiParse(_))));
}

// ===== HTTP =====

#[tokio::test]
async fn chat_posts_completions_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-or-test"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "max_tokens": 150,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "hi" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test/model",
            "choices": [{ "message": { "role": "assistant", "content": "hey" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&format!("{}/", server.uri()));
    let resp = client
        .chat(OPTIONS, "sys", &[Message::new("user", "hi")])
        .await
        .unwrap();
    assert_eq!(resp.content, "hey");
}

#[tokio::test]
async fn chat_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let err = client
        .chat(OPTIONS, "sys", &[Message::new("user", "hi")])
        .await
        .unwrap_err();
    match err {
        LlmError::ApiResponse { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected ApiResponse, got {other:?}"),
    }
}
