//! Model client driving the Tushare executor over an in-memory data source

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tempfile::tempdir;
use trendradar_ai::config::{ConfigProvider, FileConfigProvider};
use trendradar_ai::secrets::MemorySecretStore;
use trendradar_ai::tushare::TushareResult;
use trendradar_ai::{
    tushare_tools, AiClient, ChatMessage, Frame, Logger, MockReply, NoOpLogger, QuerySource,
    RequestOptions, ScriptedBackend, ToolCall, ToolExecutor, TushareToolExecutor,
};

fn logger() -> Arc<dyn Logger> {
    Arc::new(NoOpLogger::new())
}

/// Serves one index frame and counts queries
#[derive(Default)]
struct IndexSource {
    queries: AtomicUsize,
}

#[async_trait]
impl QuerySource for IndexSource {
    async fn query(&self, api_name: &str, params: &Map<String, Value>, _fields: &str) -> TushareResult<Frame> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if api_name != "index_daily" || params.get("ts_code") != Some(&json!("000001.SH")) {
            return Ok(Frame::default());
        }
        Ok(Frame::from_rows(
            &["trade_date", "open", "close", "high", "low", "change", "pct_chg", "vol", "amount"],
            vec![json!(["20260214", 3300.12, 3321.5, 3330.0, 3290.4, 21.38, 0.6478, 412345678.0, 523456789.4])],
        ))
    }
}

#[tokio::test]
async fn test_model_reads_index_table() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            MockReply::ToolCalls(vec![ToolCall::new(
                "call_0",
                "get_index_daily",
                r#"{"ts_code": "000001.SH", "trade_date": "20260214"}"#,
            )]),
            MockReply::Text("上证指数上涨 0.65%".to_string()),
        ],
        logger(),
    ));
    let source = Arc::new(IndexSource::default());
    let executor = TushareToolExecutor::new("ts-test", logger()).with_source(source.clone());
    let client = AiClient::with_backend(
        trendradar_ai::ClientConfig::new("deepseek/deepseek-chat").with_api_key("sk-test"),
        backend.clone(),
        logger(),
    );

    let answer = client
        .chat_with_tools_default(
            &[ChatMessage::user("今天大盘怎么样？")],
            &tushare_tools(),
            &executor,
            &RequestOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(answer, "上证指数上涨 0.65%");
    assert_eq!(source.queries.load(Ordering::SeqCst), 1);

    let requests = backend.requests();
    assert_eq!(requests[0].tools.as_ref().map(Vec::len), Some(8));

    let table = &requests[1].messages[2].content;
    assert!(table.starts_with("指数 000001.SH 日线行情（共 1 条）："));
    assert!(table.contains("20260214 | 3300.12 | 3321.5 | 3330.0 | 3290.4 | 21.38 | 0.65 | 412345678 | 523456789"));
}

#[tokio::test]
async fn test_validation_errors_skip_the_source() {
    let source = Arc::new(IndexSource::default());
    let executor = TushareToolExecutor::new("ts-test", logger()).with_source(source.clone());

    let sector = executor.execute("get_concept_sector_daily", &Map::new()).await;
    let top = executor.execute("get_top_list", &Map::new()).await;
    let limit = executor.execute("get_limit_list", &Map::new()).await;

    for text in [&sector, &top, &limit] {
        assert!(text.starts_with("错误："), "{}", text);
    }
    assert_eq!(source.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_data_message() {
    let executor = TushareToolExecutor::new("ts-test", logger()).with_source(Arc::new(IndexSource::default()));

    let text = executor
        .execute("get_index_daily", json!({"ts_code": "399006.SZ"}).as_object().unwrap())
        .await;

    assert_eq!(text, "未查询到指数 399006.SZ 的行情数据。可能是非交易日或代码有误。");
}

#[test]
fn test_config_file_builds_working_components() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "AI:\n  MODEL: deepseek/deepseek-chat\n  TIMEOUT: 30\nTUSHARE:\n  TOKEN: ''\n",
    )
    .unwrap();

    let secrets = MemorySecretStore::new()
        .with("ai", "sk-env")
        .with("tushare", "ts-env");
    let config = FileConfigProvider::new(&path).resolve(&secrets).unwrap();

    let client = AiClient::with_backend(
        config.ai.to_client_config(),
        Arc::new(ScriptedBackend::echo(logger())),
        logger(),
    );
    assert_eq!(client.validate_config(), (true, String::new()));
    assert_eq!(client.config().timeout_secs(), 30);

    let executor = TushareToolExecutor::new(config.tushare.token, logger());
    assert_eq!(executor.validate(), (true, String::new()));
    assert!(!executor.is_initialized());
}
