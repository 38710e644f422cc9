//! # Domain Models
//!
//! Types shared by the fetcher, the view-model, and the renderers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | One of the instruments offered by the dashboard menu |
//! | [`ChartKind`] | Display mode (candlestick, line, bar, scatter) |
//! | [`PriceSeries`] | Labelled close prices in upstream order |
//! | [`Candle`] | OHLC point with a UTC timestamp |
//! | [`PredictionSeries`] | Model output aligned to the tail of the close series |
//! | [`UtcDateTime`] | UTC timestamp with lenient parsing |

mod chart_kind;
mod models;
mod ticker;
mod timestamp;

pub use chart_kind::ChartKind;
pub use models::{Candle, PredictionSeries, PricePoint, PriceSeries};
pub use ticker::Ticker;
pub use timestamp::UtcDateTime;
