use atheris_llm::{
    ChatMessage, CompletionClient, CompletionOptions, CompletionRequest, GroqClient, StreamEvent,
    REASONING_MODEL,
};
use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

fn sse_body(chunks: &[serde_json::Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn content_chunk(text: &str) -> serde_json::Value {
    json!({"id": "c", "model": "m", "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]})
}

#[tokio::test]
async fn test_stream_completion_yields_deltas_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({"model": "llama3-8b-8192", "stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&[content_chunk("Hi"), content_chunk(" there")]))
        .create_async()
        .await;

    let client = GroqClient::with_base_url("test-key", server.url()).unwrap();
    let request = CompletionRequest::new("llama3-8b-8192", vec![ChatMessage::user("Hello")]);

    let events: Vec<StreamEvent> = client
        .stream_completion(request)
        .await
        .unwrap()
        .map(|e| e.unwrap())
        .collect()
        .await;

    mock.assert_async().await;
    assert_eq!(
        events,
        vec![
            StreamEvent::message("Hi"),
            StreamEvent::message(" there"),
            StreamEvent::done(),
        ]
    );
}

#[tokio::test]
async fn test_reasoning_request_uses_reasoning_model_and_parsed_format() {
    let mut server = mockito::Server::new_async().await;
    let body = sse_body(&[
        json!({"choices": [{"index": 0, "delta": {"reasoning": "Let me add."}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {"content": "4"}, "finish_reason": "stop"}]}),
    ]);
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": REASONING_MODEL,
            "reasoning_format": "parsed",
        })))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = GroqClient::with_base_url("test-key", server.url()).unwrap();
    let request = CompletionRequest::new("llama-3.1-8b-instant", vec![ChatMessage::user("2+2?")])
        .with_options(CompletionOptions::new().use_reasoning(true));

    let events: Vec<StreamEvent> = client
        .stream_completion(request)
        .await
        .unwrap()
        .map(|e| e.unwrap())
        .collect()
        .await;

    mock.assert_async().await;
    assert_eq!(events[0], StreamEvent::reasoning("Let me add."));
    assert_eq!(events[1], StreamEvent::message("4"));
    assert!(matches!(events[2], StreamEvent::Done { .. }));
}

#[tokio::test]
async fn test_error_status_fails_before_streaming() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
        .create_async()
        .await;

    let client = GroqClient::with_base_url("bad-key", server.url()).unwrap();
    let request = CompletionRequest::new("llama3-8b-8192", vec![ChatMessage::user("Hello")]);

    let err = match client.stream_completion(request).await {
        Ok(_) => panic!("Expected an error"),
        Err(e) => e.to_string(),
    };
    assert!(err.contains("401"));
    assert!(err.contains("Invalid API Key"));
}

#[tokio::test]
async fn test_complete_parses_message_and_usage() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": false})))
        .with_status(200)
        .with_body(
            json!({
                "id": "cmpl-1",
                "model": "llama3-8b-8192",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hello!"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GroqClient::with_base_url("test-key", server.url()).unwrap();
    let response = client
        .complete(CompletionRequest::new("llama3-8b-8192", vec![ChatMessage::user("Hi")]))
        .await
        .unwrap();

    assert_eq!(response.content.as_deref(), Some("Hello!"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 7);
}
