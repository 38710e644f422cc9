mod http_api;

pub use http_api::{
    parse_candlesticks, parse_predictions, parse_price_series, HttpPredictionApi,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};
