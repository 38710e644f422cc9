//! API contract for the prediction backend.
//!
//! # Endpoints
//!
//! | Endpoint | Path | Response |
//! |----------|------|----------|
//! | [`Endpoint::Stock`] | `/stock/{ticker}` | [`PriceSeries`] |
//! | [`Endpoint::Candlestick`] | `/candlestick/{ticker}` | `Vec<`[`Candle`]`>` |
//! | [`Endpoint::Predict`] | `/predict/{ticker}` | [`PredictionSeries`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Candle, PredictionSeries, PriceSeries, Ticker};

/// One of the three data sources behind the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Stock,
    Candlestick,
    Predict,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Stock, Endpoint::Candlestick, Endpoint::Predict];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Candlestick => "candlestick",
            Self::Predict => "predict",
        }
    }

    /// Path for `ticker`, with the ticker percent-encoded.
    pub fn path(self, ticker: Ticker) -> String {
        format!(
            "/{}/{}",
            self.as_str(),
            urlencoding::encode(ticker.as_str())
        )
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Request never produced a response (timeout, refused connection).
    Transport,
    /// Upstream answered with a non-2xx status.
    Status,
    /// Body was not the JSON shape the endpoint promises.
    Decode,
    /// Body parsed but a required field was absent.
    MissingField,
}

/// Structured error returned by [`PredictionApi`] calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    endpoint: Endpoint,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn transport(endpoint: Endpoint, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            endpoint,
            message: message.into(),
            retryable,
        }
    }

    pub fn status(endpoint: Endpoint, status: u16, retryable: bool) -> Self {
        Self {
            kind: FetchErrorKind::Status,
            endpoint,
            message: format!("upstream returned status {status}"),
            retryable,
        }
    }

    pub fn decode(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            endpoint,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn missing_field(endpoint: Endpoint, field: &str) -> Self {
        Self {
            kind: FetchErrorKind::MissingField,
            endpoint,
            message: format!("response is missing the '{field}' field"),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::Status => "fetch.status",
            FetchErrorKind::Decode => "fetch.decode",
            FetchErrorKind::MissingField => "fetch.missing_field",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.endpoint, self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Boxed future returned by [`PredictionApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Contract for the three dashboard data sources.
///
/// Implementations must be `Send + Sync`; the fetcher shares one instance
/// across the three per-endpoint tasks.
pub trait PredictionApi: Send + Sync {
    /// Daily close prices keyed by date label.
    fn price_series<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, PriceSeries>;

    /// Intraday OHLC candles.
    fn candlesticks<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, Vec<Candle>>;

    /// Model predictions for the most recent closes.
    fn predictions<'a>(&'a self, ticker: Ticker) -> ApiFuture<'a, PredictionSeries>;
}
