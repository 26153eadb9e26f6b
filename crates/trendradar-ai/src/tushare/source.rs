//! Tushare Pro data sources
//!
//! The Tushare Pro HTTP API takes a JSON body
//! `{api_name, token, params, fields}` and answers
//! `{code, msg, data: {fields, items}}`, where `items` is a list of rows in
//! `fields` order.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::error::{TushareError, TushareResult};

/// Default Tushare Pro endpoint
pub const DEFAULT_ENDPOINT: &str = "http://api.tushare.pro";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can answer a Tushare query
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Run `api_name` with `params`; an empty `fields` asks for the API's default columns
    async fn query(&self, api_name: &str, params: &Map<String, Value>, fields: &str) -> TushareResult<Frame>;
}

/// Tabular query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub fields: Vec<String>,
    pub items: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(fields: Vec<String>, items: Vec<Vec<Value>>) -> Self {
        Self { fields, items }
    }

    /// Build from column names and rows given as JSON arrays
    pub fn from_rows(fields: &[&str], rows: Vec<Value>) -> Self {
        let items = rows
            .into_iter()
            .map(|row| match row {
                Value::Array(values) => values,
                other => vec![other],
            })
            .collect();
        Self::new(fields.iter().map(|f| f.to_string()).collect(), items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> impl Iterator<Item = Row<'_>> {
        self.rows().take(n)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.items.iter().map(move |values| Row { frame: self, values })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}

/// Borrowed view of one frame row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    frame: &'a Frame,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Raw cell; missing columns and nulls are `None`
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let value = self.values.get(self.frame.column(name)?)?;
        (!value.is_null()).then_some(value)
    }

    /// Numeric cell; numeric strings are parsed, anything else is `None`
    pub fn num(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Cell as display text, `-` when missing
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        }
    }

    /// Cell as display text, `-` when missing or empty
    pub fn text_or_dash(&self, name: &str) -> String {
        let text = self.text(name);
        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Frame>,
}

/// Query source backed by the Tushare Pro HTTP API
#[derive(Clone)]
pub struct HttpQuerySource {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    token: String,
}

impl HttpQuerySource {
    /// Source for the default endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(token: impl Into<String>) -> TushareResult<Self> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT)
    }

    /// Source for an explicit endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built
    pub fn with_endpoint(token: impl Into<String>, endpoint: &str) -> TushareResult<Self> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| TushareError::Client(format!("invalid endpoint {}: {}", endpoint, e)))?;
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| TushareError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl std::fmt::Debug for HttpQuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQuerySource")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[async_trait]
impl QuerySource for HttpQuerySource {
    async fn query(&self, api_name: &str, params: &Map<String, Value>, fields: &str) -> TushareResult<Frame> {
        let body = json!({
            "api_name": api_name,
            "token": self.token,
            "params": params,
            "fields": fields,
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| TushareError::Decode(e.to_string()))?;

        if parsed.code != 0 {
            return Err(TushareError::Api {
                code: parsed.code,
                msg: parsed.msg.unwrap_or_default(),
            });
        }

        Ok(parsed.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_rows(
            &["ts_code", "close", "pct_chg", "name"],
            vec![
                json!(["000001.SZ", 10.5, "1.234", ""]),
                json!(["600519.SH", null, null, "贵州茅台"]),
            ],
        )
    }

    #[test]
    fn test_row_accessors() {
        let frame = frame();
        let rows: Vec<Row<'_>> = frame.rows().collect();

        assert_eq!(rows[0].text("ts_code"), "000001.SZ");
        assert_eq!(rows[0].text("close"), "10.5");
        assert_eq!(rows[0].num("pct_chg"), Some(1.234));
        assert_eq!(rows[0].text_or_dash("name"), "-");

        assert!(rows[1].get("close").is_none());
        assert_eq!(rows[1].text("close"), "-");
        assert_eq!(rows[1].text("no_such_column"), "-");
        assert_eq!(rows[1].num("pct_chg"), None);
    }

    #[test]
    fn test_head() {
        let frame = frame();
        assert_eq!(frame.head(1).count(), 1);
        assert_eq!(frame.head(10).count(), 2);
        assert!(!frame.is_empty());
        assert!(Frame::default().is_empty());
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{"request_id":"x","code":0,"msg":"","data":{"fields":["ts_code"],"items":[["000001.SH"]],"has_more":false}}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 0);
        assert_eq!(parsed.data.unwrap().len(), 1);

        let body = r#"{"code":40101,"msg":"抱歉，您输入的TOKEN无效！","data":null}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 40101);
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = HttpQuerySource::with_endpoint("t", "not a url").unwrap_err();
        assert_eq!(err.kind(), "ClientError");
        assert_eq!(
            HttpQuerySource::new("t").unwrap().endpoint(),
            "http://api.tushare.pro/"
        );
    }
}
