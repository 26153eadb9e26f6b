//! End-to-end behaviour of the tool-calling loop against a scripted backend

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use trendradar_ai::logging::RecordingLogger;
use trendradar_ai::{
    AiClient, ChatMessage, ClientConfig, ClientError, FnExecutor, FunctionCalling, Logger,
    MessageRole, MockReply, NoOpLogger, RequestOptions, ScriptedBackend, StaticProbe, Tool,
    ToolCall, ToolExecutor,
};

fn logger() -> Arc<dyn Logger> {
    Arc::new(NoOpLogger::new())
}

fn config() -> ClientConfig {
    ClientConfig::new("deepseek/deepseek-chat").with_api_key("sk-test")
}

fn client(backend: &Arc<ScriptedBackend>, probe: FunctionCalling) -> AiClient {
    AiClient::with_backend(config(), backend.clone(), logger()).with_probe(Arc::new(StaticProbe(probe)))
}

fn tools() -> Vec<Tool> {
    vec![Tool::new("lookup", "Look something up")]
}

/// Executor that records every call it receives
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

#[async_trait::async_trait]
impl ToolExecutor for RecordingExecutor {
    async fn execute(&self, function_name: &str, arguments: &Map<String, Value>) -> String {
        let mut calls = self.calls.lock();
        calls.push((function_name.to_string(), arguments.clone()));
        format!("result {}", calls.len())
    }
}

#[tokio::test]
async fn test_round_budget_bounds_requests() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            MockReply::call("c1", "lookup", "{}"),
            MockReply::call("c2", "lookup", "{}"),
            MockReply::call("c3", "lookup", "{}"),
            MockReply::Text("final".to_string()),
        ],
        logger(),
    ));
    let executor = RecordingExecutor::default();

    let answer = client(&backend, FunctionCalling::Supported)
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 3, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(answer, "final");
    assert_eq!(backend.request_count(), 4);
    assert_eq!(executor.calls.lock().len(), 3);

    let requests = backend.requests();
    assert!(requests[..3].iter().all(|r| r.has_tools()));
    assert!(requests[3].tools.is_none());
    assert!(requests[3].tool_choice.is_none());
    assert_eq!(requests[3].messages.len(), 1 + 3 * 2);
}

#[tokio::test]
async fn test_budget_exhausted_with_null_final_answer() {
    let backend = Arc::new(ScriptedBackend::fixed(MockReply::call("c", "lookup", "{}"), logger()));
    let executor = RecordingExecutor::default();

    let answer = client(&backend, FunctionCalling::Supported)
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 1, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(answer, "");
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn test_unsupported_model_falls_back_to_chat() {
    let messages = [ChatMessage::system("s"), ChatMessage::user("hello")];

    let backend = Arc::new(ScriptedBackend::echo(logger()));
    let executor = RecordingExecutor::default();
    let with_tools = client(&backend, FunctionCalling::Unsupported)
        .chat_with_tools(&messages, &tools(), &executor, 5, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(backend.request_count(), 1);
    assert!(!backend.requests()[0].has_tools());
    assert!(executor.calls.lock().is_empty());

    let plain_backend = Arc::new(ScriptedBackend::echo(logger()));
    let plain = client(&plain_backend, FunctionCalling::Unsupported)
        .chat(&messages, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(with_tools, plain);
    assert_eq!(backend.requests()[0], plain_backend.requests()[0]);
}

#[tokio::test]
async fn test_calls_answered_in_order() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            MockReply::ToolCalls(vec![
                ToolCall::new("a", "first", r#"{"n": 1}"#),
                ToolCall::new("b", "second", r#"{"n": 2}"#),
                ToolCall::new("c", "third", r#"{"n": 3}"#),
            ]),
            MockReply::Text("done".to_string()),
        ],
        logger(),
    ));
    let executor = RecordingExecutor::default();

    client(&backend, FunctionCalling::Supported)
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 30, &RequestOptions::new())
        .await
        .unwrap();

    let names: Vec<String> = executor.calls.lock().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, ["first", "second", "third"]);

    let sent = &backend.requests()[1].messages;
    assert_eq!(sent[1].role, MessageRole::Assistant);
    assert_eq!(sent[1].tool_calls.len(), 3);

    let answered: Vec<(&str, &str, &str)> = sent[2..]
        .iter()
        .map(|m| {
            (
                m.tool_call_id.as_deref().unwrap_or_default(),
                m.name.as_deref().unwrap_or_default(),
                m.content.as_str(),
            )
        })
        .collect();
    assert_eq!(
        answered,
        [("a", "first", "result 1"), ("b", "second", "result 2"), ("c", "third", "result 3")]
    );
}

#[tokio::test]
async fn test_malformed_arguments_become_empty_map() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            MockReply::ToolCalls(vec![
                ToolCall::new("a", "lookup", "{broken"),
                ToolCall::new("b", "lookup", ""),
                ToolCall::new("c", "lookup", "\"just a string\""),
            ]),
            MockReply::Text("ok".to_string()),
        ],
        logger(),
    ));
    let executor = RecordingExecutor::default();

    let answer = client(&backend, FunctionCalling::Supported)
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 2, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(answer, "ok");
    assert!(executor.calls.lock().iter().all(|(_, args)| args.is_empty()));
}

#[tokio::test]
async fn test_backend_error_mid_loop_propagates() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            MockReply::call("a", "lookup", "{}"),
            MockReply::Error("upstream unavailable".to_string()),
        ],
        logger(),
    ));
    let executor = RecordingExecutor::default();

    let err = client(&backend, FunctionCalling::Supported)
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 5, &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Provider { .. }));
    assert_eq!(executor.calls.lock().len(), 1);
}

#[tokio::test]
async fn test_caller_messages_untouched() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![MockReply::call("a", "lookup", "{}"), MockReply::Text("ok".to_string())],
        logger(),
    ));
    let messages = vec![ChatMessage::user("q")];
    let snapshot = messages.clone();
    let executor = FnExecutor::new(|_: &str, _: &Map<String, Value>| "r".to_string());

    client(&backend, FunctionCalling::Supported)
        .chat_with_tools_default(&messages, &tools(), &executor, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(messages, snapshot);
}

#[tokio::test]
async fn test_long_result_preview_and_full_content() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![MockReply::call("a", "lookup", "{}"), MockReply::Text("ok".to_string())],
        logger(),
    ));
    let recorder = Arc::new(RecordingLogger::new());
    let client = AiClient::with_backend(config(), backend.clone(), recorder.clone())
        .with_probe(Arc::new(StaticProbe(FunctionCalling::Supported)));

    let long = "板块".repeat(300);
    let expected = long.clone();
    let executor = FnExecutor::new(move |_: &str, _: &Map<String, Value>| long.clone());

    client
        .chat_with_tools(&[ChatMessage::user("q")], &tools(), &executor, 2, &RequestOptions::new())
        .await
        .unwrap();

    assert!(recorder.contains("full length 600 chars"));
    assert!(!recorder.messages().iter().any(|m| m.contains(&expected)));
    assert_eq!(backend.requests()[1].messages[2].content, expected);
}

#[test]
fn test_validate_config() {
    let check = |config: ClientConfig| {
        AiClient::with_backend(config, Arc::new(ScriptedBackend::echo(logger())), logger())
            .validate_config()
    };

    assert_eq!(check(config()), (true, String::new()));
    assert!(!check(ClientConfig::new("").with_api_key("sk")).0);
    assert!(!check(ClientConfig::new("deepseek/deepseek-chat")).0);

    let (ok, reason) = check(ClientConfig::new("gpt4").with_api_key("sk"));
    assert!(!ok);
    assert!(reason.contains("gpt4"));
}
