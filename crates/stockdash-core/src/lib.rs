//! # Stockdash Core
//!
//! Data plumbing and view-model for the stock prediction dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | HTTP adapter for the prediction API |
//! | [`dashboard`] | View-model owning selection, caches, and viewport |
//! | [`data_source`] | API contract, endpoints, and fetch errors |
//! | [`domain`] | Tickers, chart kinds, price/candle/prediction series |
//! | [`error`] | Validation errors |
//! | [`fetcher`] | One tokio task per endpoint, cancelled per selection |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`render`] | Chart dataset shaping |
//! | [`retry`] | Opt-in retry with backoff |
//! | [`selection`] | Ticker/chart selection and fetch generations |
//! | [`viewport`] | Horizontal pan/zoom window |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  select   ┌──────────────────┐
//! │  Terminal / CLI │──────────▶│    Dashboard     │
//! └────────▲────────┘           │  (view-model)    │
//!          │ render plan        └───────┬──────────┘
//!          │                            │ FetchCycle
//!          │                            ▼
//!          │                    ┌──────────────────┐
//!          │      FetchOutcome  │     Fetcher      │
//!          └────────────────────│ stock/candle/    │
//!                               │ predict tasks    │
//!                               └───────┬──────────┘
//!                                       ▼
//!                               ┌──────────────────┐
//!                               │ PredictionApi    │
//!                               │ over HttpClient  │
//!                               └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockdash_core::{ChartKind, Dashboard, Fetcher, HttpPredictionApi, Ticker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (mut fetcher, mut outcomes) = Fetcher::new(Arc::new(HttpPredictionApi::default()));
//!     let mut dashboard = Dashboard::new(Ticker::Aapl, ChartKind::Line);
//!     fetcher.start(dashboard.initial_cycle());
//!
//!     while dashboard.is_fetching() {
//!         if let Some(outcome) = outcomes.recv().await {
//!             dashboard.apply(outcome);
//!         }
//!     }
//!     println!("{:?}", dashboard.render_plan());
//! }
//! ```

pub mod adapters;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod render;
pub mod retry;
pub mod selection;
pub mod viewport;

pub use adapters::{HttpPredictionApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

pub use dashboard::{ApplyResult, Dashboard, DataCache};

pub use data_source::{ApiFuture, Endpoint, FetchError, FetchErrorKind, PredictionApi};

pub use domain::{Candle, ChartKind, PredictionSeries, PricePoint, PriceSeries, Ticker, UtcDateTime};

pub use error::ValidationError;

pub use fetcher::{FetchOutcome, Fetcher, SourcePayload};

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use render::{ChartData, OhlcPoint, RenderPlan, SeriesChart};

pub use retry::{Backoff, RetryConfig};

pub use selection::{FetchCycle, Generation, Selection};

pub use viewport::Viewport;
