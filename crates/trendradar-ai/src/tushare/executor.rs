//! Tushare tool executor
//!
//! Answers the eight Tushare functions with compact text tables. Every
//! failure comes back as text so the model can read it as tool output.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{TushareError, TushareResult};
use super::format::{fmt, fmt_amount, fmt_mv, fmt_num, limit_label};
use super::schema::TushareFunction;
use super::source::{Frame, HttpQuerySource, QuerySource, DEFAULT_ENDPOINT};
use crate::logging::Logger;
use crate::{log_debug, log_error, log_warn};
use crate::tools::{truncate_with_ellipsis, unknown_function, ToolExecutor, ERROR_MARKER};

/// Longest upstream error message kept in tool output
const MAX_ERROR_CHARS: usize = 200;

const SECTOR_DAILY_ROWS: usize = 20;
const INDEX_DAILY_ROWS: usize = 10;
const DAILY_BASIC_ROWS: usize = 5;
const STOCK_DAILY_ROWS: usize = 10;
const LIMIT_LIST_ROWS: usize = 50;
const TOP_LIST_ROWS: usize = 30;
const MONEYFLOW_ROWS: usize = 5;

/// Accept a string, a number or null for a text argument
fn text_arg<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(de::Error::custom(format!("expected a string, got {}", other))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectorDailyArgs {
    #[serde(default, deserialize_with = "text_arg")]
    ts_code: String,
    #[serde(default, deserialize_with = "text_arg")]
    trade_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MembersArgs {
    #[serde(deserialize_with = "text_arg")]
    ts_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CodeDateArgs {
    #[serde(deserialize_with = "text_arg")]
    ts_code: String,
    #[serde(default, deserialize_with = "text_arg")]
    trade_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitListArgs {
    #[serde(default, deserialize_with = "text_arg")]
    trade_date: String,
    #[serde(default, deserialize_with = "text_arg")]
    limit_type: String,
    #[serde(default, deserialize_with = "text_arg")]
    ts_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopListArgs {
    #[serde(default, deserialize_with = "text_arg")]
    trade_date: String,
    #[serde(default, deserialize_with = "text_arg")]
    ts_code: String,
}

fn decode<T: DeserializeOwned>(arguments: &Map<String, Value>) -> TushareResult<T> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| TushareError::InvalidArguments(e.to_string()))
}

/// Query parameters with empty values left out
fn params(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), Value::from(*value)))
        .collect()
}

/// Executes Tushare tool calls against a `QuerySource`
///
/// The HTTP source is built on the first query that reaches it and reused
/// afterwards; calls rejected by argument validation never build it.
pub struct TushareToolExecutor {
    token: String,
    endpoint: String,
    source: OnceCell<Arc<dyn QuerySource>>,
    logger: Arc<dyn Logger>,
}

impl TushareToolExecutor {
    /// Executor over the Tushare Pro HTTP API
    pub fn new(token: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source: OnceCell::new(),
            logger,
        }
    }

    /// Use another HTTP endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use an already built source instead of the HTTP API
    pub fn with_source(mut self, source: Arc<dyn QuerySource>) -> Self {
        self.source = OnceCell::with_value(source);
        self
    }

    /// Whether the data source has been built
    pub fn is_initialized(&self) -> bool {
        self.source.get().is_some()
    }

    /// Check the token and endpoint without any network access
    pub fn validate(&self) -> (bool, String) {
        if self.token.is_empty() {
            return (
                false,
                "未配置 Tushare Token，请在 config.yaml 或环境变量 TUSHARE_TOKEN 中设置".to_string(),
            );
        }
        if self.source.get().is_none() && reqwest::Url::parse(&self.endpoint).is_err() {
            return (
                false,
                format!("Tushare 数据源无法加载：接口地址无效 ({})", self.endpoint),
            );
        }
        (true, String::new())
    }

    fn source(&self) -> TushareResult<&Arc<dyn QuerySource>> {
        self.source.get_or_try_init(|| {
            log_debug!(self.logger, "[Tushare] connecting to {}", self.endpoint);
            let source = HttpQuerySource::with_endpoint(self.token.clone(), &self.endpoint)?;
            Ok(Arc::new(source) as Arc<dyn QuerySource>)
        })
    }

    async fn query(&self, function: TushareFunction, params: &Map<String, Value>) -> TushareResult<Frame> {
        let frame = self
            .source()?
            .query(function.api_name(), params, function.fields())
            .await?;
        log_debug!(self.logger, "[Tushare] {} returned {} row(s)", function.api_name(), frame.len());
        Ok(frame)
    }

    async fn run(&self, function: TushareFunction, arguments: &Map<String, Value>) -> TushareResult<String> {
        match function {
            TushareFunction::ConceptSectorDaily => {
                let args: SectorDailyArgs = decode(arguments)?;
                self.concept_sector_daily(&args.ts_code, &args.trade_date).await
            }
            TushareFunction::ConceptSectorMembers => {
                let args: MembersArgs = decode(arguments)?;
                self.concept_sector_members(&args.ts_code).await
            }
            TushareFunction::IndexDaily => {
                let args: CodeDateArgs = decode(arguments)?;
                self.index_daily(&args.ts_code, &args.trade_date).await
            }
            TushareFunction::StockDailyBasic => {
                let args: CodeDateArgs = decode(arguments)?;
                self.stock_daily_basic(&args.ts_code, &args.trade_date).await
            }
            TushareFunction::StockDaily => {
                let args: CodeDateArgs = decode(arguments)?;
                self.stock_daily(&args.ts_code, &args.trade_date).await
            }
            TushareFunction::LimitList => {
                let args: LimitListArgs = decode(arguments)?;
                self.limit_list(&args.trade_date, &args.limit_type, &args.ts_code)
                    .await
            }
            TushareFunction::TopList => {
                let args: TopListArgs = decode(arguments)?;
                self.top_list(&args.trade_date, &args.ts_code).await
            }
            TushareFunction::Moneyflow => {
                let args: CodeDateArgs = decode(arguments)?;
                self.moneyflow(&args.ts_code, &args.trade_date).await
            }
        }
    }

    // ========================================================================
    // Sectors
    // ========================================================================

    /// Concept sector daily quotes, first 20 rows
    pub async fn concept_sector_daily(&self, ts_code: &str, trade_date: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code), ("trade_date", trade_date)]);
        if params.is_empty() {
            return Ok(format!(
                "{}请至少提供板块代码（ts_code）或交易日期（trade_date）之一。",
                ERROR_MARKER
            ));
        }

        let frame = self.query(TushareFunction::ConceptSectorDaily, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到数据（ts_code={}, trade_date={}）。可能是非交易日或代码有误。",
                ts_code, trade_date
            ));
        }

        let rows: Vec<_> = frame.head(SECTOR_DAILY_ROWS).collect();
        let mut lines = vec![
            format!("同花顺概念板块日线行情（共 {} 条）：", rows.len()),
            "板块代码 | 交易日 | 开盘 | 收盘 | 最高 | 最低 | 涨跌幅(%) | 成交量 | 换手率(%)".to_string(),
            "-".repeat(80),
        ];
        for row in rows {
            lines.push(format!(
                "{} | {} | {} | {} | {} | {} | {} | {} | {}",
                row.text("ts_code"),
                row.text("trade_date"),
                row.text("open"),
                row.text("close"),
                row.text("high"),
                row.text("low"),
                fmt(row.num("pct_change")),
                fmt_num(row.num("vol"), 0),
                fmt(row.num("turnover_rate")),
            ));
        }

        Ok(lines.join("\n"))
    }

    /// All member stocks of a concept sector
    pub async fn concept_sector_members(&self, ts_code: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code)]);

        let frame = self.query(TushareFunction::ConceptSectorMembers, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到板块 {} 的成分股数据。请检查板块代码是否正确。",
                ts_code
            ));
        }

        let mut lines = vec![
            format!("板块 {} 成分股列表（共 {} 只）：", ts_code, frame.len()),
            "股票代码 | 股票名称".to_string(),
            "-".repeat(40),
        ];
        lines.extend(
            frame
                .rows()
                .map(|row| format!("{} | {}", row.text("con_code"), row.text("con_name"))),
        );

        Ok(lines.join("\n"))
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Index daily quotes, first 10 rows
    pub async fn index_daily(&self, ts_code: &str, trade_date: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code), ("trade_date", trade_date)]);

        let frame = self.query(TushareFunction::IndexDaily, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到指数 {} 的行情数据。可能是非交易日或代码有误。",
                ts_code
            ));
        }

        let rows: Vec<_> = frame.head(INDEX_DAILY_ROWS).collect();
        let mut lines = vec![
            format!("指数 {} 日线行情（共 {} 条）：", ts_code, rows.len()),
            "交易日 | 开盘 | 收盘 | 最高 | 最低 | 涨跌点 | 涨跌幅(%) | 成交量(手) | 成交额(千元)".to_string(),
            "-".repeat(100),
        ];
        for row in rows {
            lines.push(format!(
                "{} | {} | {} | {} | {} | {} | {} | {} | {}",
                row.text("trade_date"),
                row.text("open"),
                row.text("close"),
                row.text("high"),
                row.text("low"),
                fmt(row.num("change")),
                fmt(row.num("pct_chg")),
                fmt_num(row.num("vol"), 0),
                fmt_num(row.num("amount"), 0),
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Per-day valuation indicators of a stock, first 5 days
    pub async fn stock_daily_basic(&self, ts_code: &str, trade_date: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code), ("trade_date", trade_date)]);

        let frame = self.query(TushareFunction::StockDailyBasic, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到股票 {} 的每日指标数据。可能是非交易日或代码有误。",
                ts_code
            ));
        }

        let rows: Vec<_> = frame.head(DAILY_BASIC_ROWS).collect();
        let mut lines = vec![format!("股票 {} 每日指标（共 {} 条）：", ts_code, rows.len())];
        for row in rows {
            lines.push(format!("\n--- {} ---", row.text("trade_date")));
            lines.push(format!("收盘价: {}", row.text("close")));
            lines.push(format!("换手率: {}%", fmt(row.num("turnover_rate"))));
            lines.push(format!("换手率(自由流通): {}%", fmt(row.num("turnover_rate_f"))));
            lines.push(format!("量比: {}", fmt(row.num("volume_ratio"))));
            lines.push(format!("市盈率(PE): {}", fmt(row.num("pe"))));
            lines.push(format!("市盈率(PE_TTM): {}", fmt(row.num("pe_ttm"))));
            lines.push(format!("市净率(PB): {}", fmt(row.num("pb"))));
            lines.push(format!("市销率(PS): {}", fmt(row.num("ps"))));
            lines.push(format!("股息率: {}%", fmt(row.num("dv_ratio"))));
            lines.push(format!("总市值: {}", fmt_mv(row.num("total_mv"))));
            lines.push(format!("流通市值: {}", fmt_mv(row.num("circ_mv"))));
        }

        Ok(lines.join("\n"))
    }

    /// Stock daily OHLCV, first 10 rows
    pub async fn stock_daily(&self, ts_code: &str, trade_date: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code), ("trade_date", trade_date)]);

        let frame = self.query(TushareFunction::StockDaily, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到股票 {} 的日线行情数据。可能是非交易日或代码有误。",
                ts_code
            ));
        }

        let rows: Vec<_> = frame.head(STOCK_DAILY_ROWS).collect();
        let mut lines = vec![
            format!("股票 {} 日线行情（共 {} 条）：", ts_code, rows.len()),
            "交易日 | 开盘 | 收盘 | 最高 | 最低 | 昨收 | 涨跌幅(%) | 成交量(手) | 成交额(千元)".to_string(),
            "-".repeat(100),
        ];
        for row in rows {
            lines.push(format!(
                "{} | {} | {} | {} | {} | {} | {} | {} | {}",
                row.text("trade_date"),
                row.text("open"),
                row.text("close"),
                row.text("high"),
                row.text("low"),
                row.text("pre_close"),
                fmt(row.num("pct_chg")),
                fmt_num(row.num("vol"), 0),
                fmt_num(row.num("amount"), 0),
            ));
        }

        Ok(lines.join("\n"))
    }

    // ========================================================================
    // Market activity
    // ========================================================================

    /// Limit-up / limit-down list, first 50 rows
    pub async fn limit_list(&self, trade_date: &str, limit_type: &str, ts_code: &str) -> TushareResult<String> {
        let params = params(&[
            ("trade_date", trade_date),
            ("limit_type", limit_type),
            ("ts_code", ts_code),
        ]);
        if params.is_empty() {
            return Ok(format!(
                "{}请至少提供交易日期（trade_date）或股票代码（ts_code）之一。",
                ERROR_MARKER
            ));
        }

        let frame = self.query(TushareFunction::LimitList, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到涨跌停数据（trade_date={}, limit_type={}）。可能是非交易日。",
                trade_date, limit_type
            ));
        }

        let rows: Vec<_> = frame.head(LIMIT_LIST_ROWS).collect();
        let mut lines = vec![
            format!("涨跌停统计（共 {} 条）：", rows.len()),
            "代码 | 名称 | 收盘 | 涨跌幅(%) | 封单比 | 封单额(万) | 首封时间 | 开板次数 | 强度 | 类型".to_string(),
            "-".repeat(110),
        ];
        for row in rows {
            lines.push(format!(
                "{} | {} | {} | {} | {} | {} | {} | {} | {} | {}",
                row.text("ts_code"),
                row.text("name"),
                row.text("close"),
                fmt(row.num("pct_chg")),
                fmt(row.num("fc_ratio")),
                fmt_num(row.num("fd_amount"), 0),
                row.text_or_dash("first_time"),
                row.text("open_times"),
                fmt_num(row.num("strth"), 1),
                limit_label(&row.text("limit")),
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Dragon-tiger list details, first 30 rows
    pub async fn top_list(&self, trade_date: &str, ts_code: &str) -> TushareResult<String> {
        let params = params(&[("trade_date", trade_date), ("ts_code", ts_code)]);
        if params.is_empty() {
            return Ok(format!(
                "{}请至少提供交易日期（trade_date）或股票代码（ts_code）之一。",
                ERROR_MARKER
            ));
        }

        let frame = self.query(TushareFunction::TopList, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到龙虎榜数据（trade_date={}, ts_code={}）。可能是非交易日或当日无龙虎榜。",
                trade_date, ts_code
            ));
        }

        let rows: Vec<_> = frame.head(TOP_LIST_ROWS).collect();
        let mut lines = vec![
            format!("龙虎榜明细（共 {} 条）：", rows.len()),
            concat!(
                "代码 | 名称 | 收盘 | 涨跌幅(%) | 龙虎榜买入(万) | 龙虎榜卖出(万) | ",
                "龙虎榜净买入(万) | 净买入占比(%) | 成交额占比(%) | 上榜原因"
            )
            .to_string(),
            "-".repeat(140),
        ];
        for row in rows {
            lines.push(format!(
                "{} | {} | {} | {} | {} | {} | {} | {} | {} | {}",
                row.text("ts_code"),
                row.text("name"),
                row.text("close"),
                fmt(row.num("pct_change")),
                fmt_amount(row.num("l_buy")),
                fmt_amount(row.num("l_sell")),
                fmt_amount(row.num("net_amount")),
                fmt(row.num("net_rate")),
                fmt(row.num("amount_rate")),
                row.text_or_dash("reason"),
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Money flow by order size, first 5 days
    pub async fn moneyflow(&self, ts_code: &str, trade_date: &str) -> TushareResult<String> {
        let params = params(&[("ts_code", ts_code), ("trade_date", trade_date)]);

        let frame = self.query(TushareFunction::Moneyflow, &params).await?;
        if frame.is_empty() {
            return Ok(format!(
                "未查询到股票 {} 的资金流向数据。可能是非交易日或代码有误。",
                ts_code
            ));
        }

        let rows: Vec<_> = frame.head(MONEYFLOW_ROWS).collect();
        let mut lines = vec![format!(
            "股票 {} 资金流向（共 {} 条，金额单位：万元）：",
            ts_code,
            rows.len()
        )];
        for row in rows {
            lines.push(format!("\n--- {} ---", row.text("trade_date")));

            let amount = |name: &str| row.num(name).unwrap_or(0.0);
            let mut main_net = 0.0;
            for (label, size, is_main) in [
                ("小单", "sm", false),
                ("中单", "md", false),
                ("大单", "lg", true),
                ("特大单", "elg", true),
            ] {
                let buy = amount(&format!("buy_{}_amount", size));
                let sell = amount(&format!("sell_{}_amount", size));
                let net = buy - sell;
                if is_main {
                    main_net += net;
                }
                lines.push(format!(
                    "{}: 买入 {} / 卖出 {} / 净额 {}",
                    label,
                    fmt_amount(Some(buy)),
                    fmt_amount(Some(sell)),
                    fmt_amount(Some(net)),
                ));
            }
            lines.push(format!("主力净流入(大单+特大单): {}", fmt_amount(Some(main_net))));
            lines.push(format!("总净流入: {}", fmt_amount(row.num("net_mf_amount"))));
        }

        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl ToolExecutor for TushareToolExecutor {
    async fn execute(&self, function_name: &str, arguments: &Map<String, Value>) -> String {
        let Some(function) = TushareFunction::from_name(function_name) else {
            log_warn!(self.logger, "[Tushare] unknown function {}", function_name);
            return unknown_function(function_name);
        };

        match self.run(function, arguments).await {
            Ok(text) => text,
            Err(TushareError::Client(msg)) => {
                log_error!(self.logger, "[Tushare] cannot build data source: {}", msg);
                format!("{}无法创建 Tushare 数据源：{}", ERROR_MARKER, msg)
            }
            Err(e) => {
                log_warn!(self.logger, "[Tushare] {} failed: {}", function, e);
                format!(
                    "Tushare 查询失败 ({}): {}",
                    e.kind(),
                    truncate_with_ellipsis(&e.to_string(), MAX_ERROR_CHARS)
                )
            }
        }
    }
}
