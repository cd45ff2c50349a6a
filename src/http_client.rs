use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::describe_error_chain;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HttpResponseSummary {
    pub status: u16,
    pub headers: Map<String, Value>,
    pub body: Value,
}

/// Network failures and non-JSON bodies share this one error class.
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(describe_error_chain(&err))
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponseSummary, HttpClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, HttpClientError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponseSummary, HttpClientError> {
        let started_at = Instant::now();

        let result = async {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let headers = headers_to_map(response.headers());
            let body = response.json::<Value>().await?;

            Ok::<_, HttpClientError>(HttpResponseSummary {
                status,
                headers,
                body,
            })
        }
        .await;

        let elapsed_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(summary) => debug!(
                url = %url,
                status = summary.status,
                duration_ms = elapsed_ms,
                "http get completed"
            ),
            Err(err) => warn!(
                url = %url,
                error = %err,
                duration_ms = elapsed_ms,
                "http get failed"
            ),
        }

        result
    }
}

/// Flattens a header map into a JSON object; repeated names keep their last value.
pub fn headers_to_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, value) in headers {
        map.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    map
}
