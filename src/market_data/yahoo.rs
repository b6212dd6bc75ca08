// =============================================================================
// Yahoo Finance chart client
// =============================================================================
//
// GET {base_url}/v8/finance/chart/{symbol}?range=7d&interval=15m
//
// The response nests parallel arrays: one timestamp array and one quote object
// whose open/high/low/close/volume arrays may contain nulls. Rows with a null
// anywhere are dropped during cleaning.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{MarketDataProvider, OhlcvSeries, RawBar};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

// -----------------------------------------------------------------------------
// Wire format
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<Option<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart response body into raw rows.
///
/// Returns `Ok(None)` when the provider answered but had nothing for the
/// symbol (no result, empty result, or a `chart.error` payload).
fn parse_chart(body: &str) -> Result<Option<Vec<RawBar>>> {
    let response: ChartResponse =
        serde_json::from_str(body).context("failed to parse chart JSON")?;

    if let Some(err) = response.chart.error {
        warn!(
            code = err.code.as_deref().unwrap_or("unknown"),
            description = err.description.as_deref().unwrap_or(""),
            "chart endpoint reported an error"
        );
        return Ok(None);
    }

    let result = match response.chart.result.and_then(|mut r| r.pop()) {
        Some(result) => result,
        None => return Ok(None),
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let rows = result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, ts)| RawBar {
            timestamp: ts.and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: at(&quote.volume, i),
        })
        .collect();

    Ok(Some(rows))
}

// -----------------------------------------------------------------------------
// Client
// -----------------------------------------------------------------------------

/// HTTP client for the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    range: String,
    interval: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client fetching `lookback_days` of `interval` bars.
    ///
    /// `timeout` bounds each request; an expired request counts as no data.
    pub fn new(lookback_days: u32, interval: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let interval = interval.into();
        debug!(lookback_days, interval = %interval, "YahooClient initialised");

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            range: format!("{lookback_days}d"),
            interval,
            timeout,
            client,
        })
    }

    /// Point the client at a different host (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }

    /// One request/response round trip. Errors here are reported by `fetch`.
    async fn request_rows(&self, symbol: &str) -> Result<Option<Vec<RawBar>>> {
        let resp = self
            .client
            .get(self.chart_url(symbol))
            .query(&[("range", self.range.as_str()), ("interval", self.interval.as_str())])
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart body for {symbol}"))?;

        if !status.is_success() {
            // Yahoo answers unknown symbols with 404 + a chart.error payload.
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            anyhow::bail!("chart endpoint returned {status} for {symbol}");
        }

        parse_chart(&body)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    #[instrument(skip(self), name = "yahoo::fetch")]
    async fn fetch(&self, symbol: &str) -> Option<Arc<OhlcvSeries>> {
        let outcome = tokio::time::timeout(self.timeout, self.request_rows(symbol)).await;

        let rows = match outcome {
            Ok(Ok(Some(rows))) => rows,
            Ok(Ok(None)) => {
                info!(symbol, "provider returned no result");
                return None;
            }
            Ok(Err(e)) => {
                warn!(symbol, error = %e, "fetch failed, treating as no data");
                return None;
            }
            Err(_) => {
                warn!(symbol, timeout_s = self.timeout.as_secs(), "fetch timed out, treating as no data");
                return None;
            }
        };

        let series = OhlcvSeries::from_raw(symbol, rows);
        if series.is_empty() {
            info!(symbol, "no complete bars after cleaning");
            return None;
        }

        debug!(symbol, bars = series.len(), "series fetched");
        Some(Arc::new(series))
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
