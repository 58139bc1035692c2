use super::*;
use crate::llm::LlmError;
use crate::state::test_helpers::MockLlm;
use widget::Turn;

fn single(text: &str) -> ChatRequest {
    ChatRequest { message: Some(text.into()), messages: None }
}

fn hello() -> Vec<Message> {
    vec![Message::new("user", "hello")]
}

// =========================================================================
// conversation_from_request
// =========================================================================

#[test]
fn single_message_becomes_one_user_turn() {
    let convo = conversation_from_request(&single("  hello  ")).unwrap();
    assert_eq!(convo, vec![Message::new("user", "hello")]);
}

#[test]
fn messages_win_over_message() {
    let request = ChatRequest {
        message: Some("ignored".into()),
        messages: Some(vec![Turn::assistant("welcome"), Turn::user("hi")]),
    };
    let convo = conversation_from_request(&request).unwrap();
    assert_eq!(convo, vec![Message::new("assistant", "welcome"), Message::new("user", "hi")]);
}

#[test]
fn empty_messages_array_falls_back_to_message() {
    let request = ChatRequest { message: Some("hi".into()), messages: Some(vec![]) };
    let convo = conversation_from_request(&request).unwrap();
    assert_eq!(convo, vec![Message::new("user", "hi")]);
}

#[test]
fn only_last_ten_turns_are_kept() {
    let mut turns = Vec::new();
    for i in 0..12 {
        turns.push(Turn::user(format!("q{i}")));
        turns.push(Turn::assistant(format!("a{i}")));
    }
    turns.push(Turn::user("latest"));
    let request = ChatRequest { message: None, messages: Some(turns) };

    let convo = conversation_from_request(&request).unwrap();
    assert_eq!(convo.len(), CONTEXT_TURNS);
    assert_eq!(convo.last().unwrap().content, "latest");
    assert_eq!(convo[0].content, "a7");
}

#[test]
fn turns_are_html_escaped() {
    let convo = conversation_from_request(&single("a < b & c")).unwrap();
    assert_eq!(convo[0].content, "a &lt; b &amp; c");
}

#[test]
fn missing_message_is_bad_request() {
    let err = conversation_from_request(&ChatRequest::default()).unwrap_err();
    assert_eq!(err, ApiError::bad_request("Message is required."));
}

#[test]
fn blank_message_is_bad_request() {
    let err = conversation_from_request(&single("   ")).unwrap_err();
    assert_eq!(err, ApiError::bad_request("Message is required."));
}

#[test]
fn script_and_oversize_messages_are_rejected() {
    assert!(matches!(
        conversation_from_request(&single("<SCRIPT>alert(1)</script>")),
        Err(ApiError::BadRequest(_))
    ));
    assert!(matches!(conversation_from_request(&single(&"x".repeat(501))), Err(ApiError::BadRequest(_))));
}

#[test]
fn conversation_must_end_with_user_turn() {
    let request = ChatRequest { message: None, messages: Some(vec![Turn::user("hi"), Turn::assistant("hey")]) };
    assert!(matches!(conversation_from_request(&request), Err(ApiError::BadRequest(_))));
}

#[test]
fn earlier_user_turns_are_validated() {
    let oversized = ChatRequest {
        message: None,
        messages: Some(vec![Turn::user("x".repeat(20_000)), Turn::user("hello")]),
    };
    assert!(matches!(conversation_from_request(&oversized), Err(ApiError::BadRequest(_))));

    let script = ChatRequest {
        message: None,
        messages: Some(vec![Turn::user("<SCRIPT>alert(1)</script>"), Turn::assistant("ok"), Turn::user("hello")]),
    };
    assert!(matches!(conversation_from_request(&script), Err(ApiError::BadRequest(_))));
}

#[test]
fn assistant_turns_are_capped() {
    let request = ChatRequest {
        message: None,
        messages: Some(vec![Turn::assistant("ស".repeat(2_000)), Turn::user("hello")]),
    };
    let convo = conversation_from_request(&request).unwrap();
    assert_eq!(convo[0].content.chars().count(), 500);
    assert_eq!(convo[1].content, "hello");
}

// =========================================================================
// reply (with MockLlm)
// =========================================================================

#[tokio::test]
async fn reply_uses_fixed_prompt_and_sampling() {
    let llm = MockLlm::new(vec![Ok("សួស្តី".into())]);
    let text = reply(&*llm, &hello()).await.unwrap();
    assert_eq!(text, "សួស្តី");

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system, SYSTEM_PROMPT);
    assert_eq!(calls[0].options.max_tokens, 150);
    assert!((calls[0].options.temperature - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn empty_completion_uses_fallback() {
    let llm = MockLlm::new(vec![Ok("  ".into())]);
    assert_eq!(reply(&*llm, &hello()).await.unwrap(), FALLBACK_REPLY);
}

#[tokio::test]
async fn upstream_failure_is_generic() {
    let llm = MockLlm::new(vec![Err(LlmError::ApiResponse { status: 502, body: "secret detail".into() })]);
    let err = reply(&*llm, &hello()).await.unwrap_err();
    assert_eq!(err, ApiError::Upstream("Failed to process chat message."));
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn conversation_is_forwarded_in_order() {
    let llm = MockLlm::new(vec![]);
    let convo = conversation_from_request(&ChatRequest {
        message: None,
        messages: Some(vec![Turn::assistant("welcome"), Turn::user("hi")]),
    })
    .unwrap();
    reply(&*llm, &convo).await.unwrap();
    assert_eq!(llm.calls()[0].messages, convo);
}
