//! Chart dataset shaping.
//!
//! Turns cached API data into the datasets a chart backend draws. Nothing
//! here touches a terminal, so the same plan feeds the ratatui view and the
//! JSON snapshot command.

use serde::Serialize;

use crate::{Candle, ChartKind, PredictionSeries, PriceSeries, UtcDateTime};

/// Most x-axis labels a chart shows.
pub const MAX_TICKS: usize = 10;

/// Close series plus the prediction overlay aligned to its tail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesChart {
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
    pub predictions: Vec<Option<f64>>,
}

impl SeriesChart {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sub-chart covering `range`, used for the pan/zoom window.
    pub fn window(&self, range: std::ops::Range<usize>) -> SeriesChart {
        SeriesChart {
            labels: self.labels[range.clone()].to_vec(),
            prices: self.prices[range.clone()].to_vec(),
            predictions: self.predictions[range].to_vec(),
        }
    }

    /// `(min, max)` over prices and present predictions.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        bounds(
            self.prices
                .iter()
                .copied()
                .chain(self.predictions.iter().flatten().copied()),
        )
    }
}

/// Candlestick dataset point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OhlcPoint {
    pub x: UtcDateTime,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

impl From<&Candle> for OhlcPoint {
    fn from(candle: &Candle) -> Self {
        Self {
            x: candle.ts,
            o: candle.open,
            h: candle.high,
            l: candle.low,
            c: candle.close,
        }
    }
}

impl OhlcPoint {
    pub fn is_bullish(&self) -> bool {
        self.c >= self.o
    }
}

/// `(min, max)` over the wicks of `points`.
pub fn ohlc_bounds(points: &[OhlcPoint]) -> Option<(f64, f64)> {
    bounds(points.iter().flat_map(|point| [point.l, point.h]))
}

/// Dataset for exactly one chart variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dataset", rename_all = "snake_case")]
pub enum ChartData {
    Series(SeriesChart),
    Candles { points: Vec<OhlcPoint> },
}

/// What the chart area shows for the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RenderPlan {
    /// Close or candle data has not arrived yet.
    Loading,
    /// Candlestick mode with an empty candle list: nothing is drawn.
    Empty,
    Chart { kind: ChartKind, data: ChartData },
}

impl RenderPlan {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Choose what to draw. Both close and candle data must be present before
/// any chart renders, whatever the selected kind.
pub fn plan(
    kind: ChartKind,
    prices: Option<&PriceSeries>,
    candles: Option<&[Candle]>,
    predictions: Option<&PredictionSeries>,
) -> RenderPlan {
    let (Some(prices), Some(candles)) = (prices, candles) else {
        return RenderPlan::Loading;
    };

    match kind {
        ChartKind::Candlestick if candles.is_empty() => RenderPlan::Empty,
        ChartKind::Candlestick => RenderPlan::Chart {
            kind,
            data: ChartData::Candles {
                points: candles.iter().map(OhlcPoint::from).collect(),
            },
        },
        ChartKind::Line | ChartKind::Bar | ChartKind::Scatter => RenderPlan::Chart {
            kind,
            data: ChartData::Series(series_chart(prices, predictions)),
        },
    }
}

pub fn series_chart(prices: &PriceSeries, predictions: Option<&PredictionSeries>) -> SeriesChart {
    let overlay = predictions.map(|p| p.values.as_slice()).unwrap_or_default();
    SeriesChart {
        labels: prices.labels(),
        prices: prices.values(),
        predictions: pad_predictions(prices.len(), overlay),
    }
}

/// Left-pad `predictions` with `None` to `len` entries so the last prediction
/// lines up with the last close. When there are more predictions than
/// closes, only the trailing `len` are kept.
pub fn pad_predictions(len: usize, predictions: &[f64]) -> Vec<Option<f64>> {
    let kept = &predictions[predictions.len().saturating_sub(len)..];
    let mut padded = vec![None; len - kept.len()];
    padded.extend(kept.iter().copied().map(Some));
    padded
}

/// Evenly spaced label indices, at most `max_ticks`, always including the
/// first and last point.
pub fn tick_indices(len: usize, max_ticks: usize) -> Vec<usize> {
    if len == 0 || max_ticks == 0 {
        return Vec::new();
    }
    if len <= max_ticks {
        return (0..len).collect();
    }
    if max_ticks == 1 {
        return vec![len - 1];
    }

    let step = (len - 1) as f64 / (max_ticks - 1) as f64;
    let mut indices: Vec<usize> = (0..max_ticks)
        .map(|i| (i as f64 * step).round() as usize)
        .collect();
    indices.dedup();
    indices
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}
