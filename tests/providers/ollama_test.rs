//! Ollama provider wire format tests.

use serde_json::json;
use suspend_doctor::providers::ollama::{
    build_request, parse_response, OllamaProvider, DEFAULT_OLLAMA_URL,
};
use suspend_doctor::providers::{CompletionRequest, LlmProvider, Message, ProviderError, Role};

fn simple_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message {
            role: Role::User,
            content: "Why does my phone not sleep?".to_owned(),
        }],
        system: Some("You are a kernel expert.".to_owned()),
        max_tokens: Some(512),
    }
}

#[test]
fn build_request_injects_system_message() {
    let req = build_request("qwen3:8b", &simple_request());
    assert_eq!(req.model, "qwen3:8b");
    assert!(!req.stream);
    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(req.messages[0].content, "You are a kernel expert.");
    assert_eq!(req.messages[1].role, "user");
}

#[test]
fn build_request_without_system() {
    let mut request = simple_request();
    request.system = None;
    let req = build_request("model", &request);
    assert_eq!(req.messages.len(), 1);
}

#[test]
fn build_request_sets_deterministic_options() {
    let req = build_request("model", &simple_request());
    let opts = req.options.expect("options should exist");
    assert_eq!(opts.num_predict, Some(512));
    assert!(opts.temperature.abs() < f32::EPSILON);
}

#[test]
fn request_serializes_stream_false() {
    let req = build_request("model", &simple_request());
    let value = serde_json::to_value(&req).expect("request should serialize");
    assert_eq!(value["stream"], json!(false));
    assert_eq!(value["options"]["num_predict"], json!(512));
}

#[test]
fn parse_response_reads_text_and_usage() {
    let body = json!({
        "model": "qwen3:8b",
        "message": {"role": "assistant", "content": "## Suspend Status\nfailing"},
        "done": true,
        "prompt_eval_count": 120,
        "eval_count": 40
    })
    .to_string();

    let resp = parse_response(&body).expect("response should parse");
    assert_eq!(resp.text, "## Suspend Status\nfailing");
    assert_eq!(resp.model, "qwen3:8b");
    assert_eq!(resp.usage.input_tokens, 120);
    assert_eq!(resp.usage.output_tokens, 40);
}

#[test]
fn parse_response_without_counts_defaults_to_zero() {
    let body = json!({
        "model": "m",
        "message": {"role": "assistant", "content": "ok"}
    })
    .to_string();
    let resp = parse_response(&body).expect("response should parse");
    assert_eq!(resp.usage.input_tokens, 0);
    assert_eq!(resp.usage.output_tokens, 0);
}

#[test]
fn parse_response_rejects_garbage() {
    assert!(matches!(
        parse_response("not json"),
        Err(ProviderError::Parse(_))
    ));
}

#[test]
fn provider_defaults() {
    let provider = OllamaProvider::new("ollama/qwen3:8b".to_owned(), "qwen3:8b".to_owned());
    assert_eq!(provider.model_id(), "ollama/qwen3:8b");
    assert_eq!(provider.model, "qwen3:8b");
    assert_eq!(provider.base_url, DEFAULT_OLLAMA_URL);
}
