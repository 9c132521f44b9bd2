/*!
 * Tests for provider request building and response extraction
 */

use anyhow::Result;
use serde_json::json;
use doctran::errors::TranslationError;
use doctran::providers::Provider;
use doctran::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use doctran::providers::mock::MockProvider;
use doctran::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use doctran::translation::Translator;

#[test]
fn test_openai_request_shouldSerializeMessagesInOrder() -> Result<()> {
    let request = OpenAIRequest::new("gpt-4o")
        .add_message("system", "Translate to Chinese")
        .add_message("user", "Hello")
        .temperature(0.3);

    assert_eq!(request.messages().len(), 2);
    let value = serde_json::to_value(&request)?;
    assert_eq!(value["model"], "gpt-4o");
    assert_eq!(value["messages"][0]["role"], "system");
    assert_eq!(value["messages"][1]["content"], "Hello");
    assert!((value["temperature"].as_f64().unwrap_or_default() - 0.3).abs() < 1e-6);
    assert!(value.get("max_tokens").is_none());
    Ok(())
}

#[test]
fn test_openai_completionsUrl_shouldJoinEndpoint() {
    let client = OpenAI::new("key", "http://localhost:1234/v1/", 30);
    assert_eq!(client.completions_url(), "http://localhost:1234/v1/chat/completions");

    let default_client = OpenAI::new("key", "", 30);
    assert_eq!(default_client.completions_url(), "https://api.openai.com/v1/chat/completions");
}

#[test]
fn test_openai_extractText_shouldUseFirstChoice() -> Result<()> {
    let response: OpenAIResponse = serde_json::from_value(json!({
        "choices": [
            {"message": {"role": "assistant", "content": "你好"}, "finish_reason": "stop"},
            {"message": {"role": "assistant", "content": "ignored"}}
        ],
        "usage": {"prompt_tokens": 10, "completion_tokens": 2}
    }))?;

    assert_eq!(OpenAI::extract_text(&response), "你好");
    Ok(())
}

#[test]
fn test_openai_extractText_withNullContent_shouldBeEmpty() -> Result<()> {
    let response: OpenAIResponse = serde_json::from_value(json!({
        "choices": [{"message": {"role": "assistant", "content": null}}]
    }))?;
    let no_choices: OpenAIResponse = serde_json::from_value(json!({"choices": []}))?;

    assert_eq!(OpenAI::extract_text(&response), "");
    assert_eq!(OpenAI::extract_text(&no_choices), "");
    Ok(())
}

#[test]
fn test_anthropic_request_shouldCarrySystemAndMaxTokens() -> Result<()> {
    let request = AnthropicRequest::new("claude-3-5-sonnet-latest", 4096)
        .system("Translate to Chinese")
        .add_message("user", "Hello")
        .temperature(0.3);

    let value = serde_json::to_value(&request)?;
    assert_eq!(value["system"], "Translate to Chinese");
    assert_eq!(value["max_tokens"], 4096);
    assert_eq!(value["messages"][0]["role"], "user");
    Ok(())
}

#[test]
fn test_anthropic_messagesUrl_shouldAppendVersionedRoute() {
    let client = Anthropic::new("key", "https://proxy.example.com/", 30);
    assert_eq!(client.messages_url(), "https://proxy.example.com/v1/messages");
}

#[test]
fn test_anthropic_extractText_shouldJoinTextBlocks() -> Result<()> {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "content": [
            {"type": "text", "text": "第一部分"},
            {"type": "text", "text": "第二部分"}
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 8}
    }))?;

    let text = Anthropic::extract_text(&response);
    assert!(text.contains("第一部分"));
    assert!(text.contains("第二部分"));
    Ok(())
}

#[test]
fn test_mock_translator_shouldTagContent() {
    let mock = MockProvider::working();

    let result = tokio_test::block_on(mock.translate("Hello", "Translate", "mock-model"));

    assert_eq!(result.ok().as_deref(), Some("[TRANSLATED] Hello"));
}

#[test]
fn test_mock_translator_withEmptyResponse_shouldFail() {
    let mock = MockProvider::empty();

    let result = tokio_test::block_on(mock.translate("Hello", "Translate", "mock-model"));

    assert!(matches!(result, Err(TranslationError::EmptyResponse(_))));
    assert_eq!(mock.request_count(), 1);
}
