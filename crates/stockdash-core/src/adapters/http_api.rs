use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::data_source::{ApiFuture, Endpoint, FetchError, PredictionApi};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{Candle, PredictionSeries, PricePoint, PriceSeries, Ticker, UtcDateTime};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Deserialize)]
struct StockPayload {
    #[serde(rename = "Close")]
    close: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct CandlestickPayload {
    candlestick: Option<Vec<CandleRecord>>,
}

#[derive(Debug, Deserialize)]
struct CandleRecord {
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
}

#[derive(Debug, Deserialize)]
struct PredictPayload {
    predictions: Option<Vec<PredictionValue>>,
}

/// The model server emits a one-column matrix (`[[v], ...]`); flat lists are
/// accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionValue {
    Flat(f64),
    Nested(Vec<f64>),
}

impl PredictionValue {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Flat(value) => Some(*value),
            Self::Nested(values) => values.first().copied(),
        }
    }
}

/// [`PredictionApi`] over HTTP against a fixed base URL.
#[derive(Clone)]
pub struct HttpPredictionApi {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
    retry: RetryConfig,
}

impl Default for HttpPredictionApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Arc::new(ReqwestHttpClient::new()))
    }
}

impl HttpPredictionApi {
    pub fn new(base_url: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::no_retry(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn url_for(&self, endpoint: Endpoint, ticker: Ticker) -> String {
        format!("{}{}", self.base_url, endpoint.path(ticker))
    }

    async fn get_body(&self, endpoint: Endpoint, ticker: Ticker) -> Result<String, FetchError> {
        let url = self.url_for(endpoint, ticker);
        let mut attempt = 0;

        loop {
            let request = HttpRequest::get(url.as_str())
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);
            debug!(%endpoint, %ticker, attempt, url = %url, "requesting");

            let error = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => FetchError::status(
                    endpoint,
                    response.status,
                    self.retry.should_retry_status(response.status),
                ),
                Err(error) => FetchError::transport(
                    endpoint,
                    error.message(),
                    self.retry.should_retry_transport(&error),
                ),
            };

            if !error.retryable() || attempt >= self.retry.max_retries {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(%endpoint, %ticker, attempt, delay_ms = delay.as_millis() as u64, error = %error, "retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl PredictionApi for HttpPredictionApi {
    fn price_series<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, PriceSeries> {
        Box::pin(async move {
            let body = self.get_body(Endpoint::Stock, ticker).await?;
            parse_price_series(&body)
        })
    }

    fn candlesticks<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, Vec<Candle>> {
        Box::pin(async move {
            let body = self.get_body(Endpoint::Candlestick, ticker).await?;
            parse_candlesticks(&body)
        })
    }

    fn predictions<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, PredictionSeries> {
        Box::pin(async move {
            let body = self.get_body(Endpoint::Predict, ticker).await?;
            parse_predictions(&body)
        })
    }
}

/// Decode a `/stock` body. Key order is preserved; non-numeric values are dropped.
pub fn parse_price_series(body: &str) -> Result<PriceSeries, FetchError> {
    let payload: StockPayload = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(Endpoint::Stock, format!("invalid stock payload: {e}")))?;
    let close = payload
        .close
        .ok_or_else(|| FetchError::missing_field(Endpoint::Stock, "Close"))?;

    let total = close.len();
    let points = close
        .into_iter()
        .filter_map(|(label, value)| value.as_f64().and_then(|v| PricePoint::new(label, v).ok()))
        .collect::<Vec<_>>();

    if points.len() < total {
        warn!(
            dropped = total - points.len(),
            "stock payload contained non-numeric close values"
        );
    }

    Ok(PriceSeries::new(points))
}

/// Decode a `/candlestick` body, converting each `Datetime` to UTC.
pub fn parse_candlesticks(body: &str) -> Result<Vec<Candle>, FetchError> {
    let payload: CandlestickPayload = serde_json::from_str(body).map_err(|e| {
        FetchError::decode(
            Endpoint::Candlestick,
            format!("invalid candlestick payload: {e}"),
        )
    })?;
    let records = payload
        .candlestick
        .ok_or_else(|| FetchError::missing_field(Endpoint::Candlestick, "candlestick"))?;

    let mut candles = Vec::with_capacity(records.len());
    for record in records {
        let candle = UtcDateTime::parse(&record.datetime).and_then(|ts| {
            Candle::new(ts, record.open, record.high, record.low, record.close)
        });
        match candle {
            Ok(candle) => candles.push(candle),
            Err(error) => warn!(datetime = %record.datetime, %error, "skipping candle"),
        }
    }

    Ok(candles)
}

/// Decode a `/predict` body into a flat series.
pub fn parse_predictions(body: &str) -> Result<PredictionSeries, FetchError> {
    let payload: PredictPayload = serde_json::from_str(body).map_err(|e| {
        FetchError::decode(Endpoint::Predict, format!("invalid predict payload: {e}"))
    })?;
    let values = payload
        .predictions
        .ok_or_else(|| FetchError::missing_field(Endpoint::Predict, "predictions"))?;

    Ok(PredictionSeries::new(
        values.iter().filter_map(PredictionValue::value).collect(),
    ))
}
