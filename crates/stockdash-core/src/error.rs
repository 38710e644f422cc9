use thiserror::Error;

/// Validation errors raised while parsing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("unsupported ticker '{value}', expected one of AAPL, GOOGL, MSFT, AMZN, TSLA")]
    UnsupportedTicker { value: String },

    #[error("invalid chart kind '{value}', expected one of candlestick, line, bar, scatter")]
    InvalidChartKind { value: String },

    #[error("unrecognized datetime '{value}'")]
    InvalidDatetime { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}
