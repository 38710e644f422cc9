//! Dashboard view-model.
//!
//! [`Dashboard`] owns the selection, the three data caches, and the pan/zoom
//! window. It is driven from a single task: user input goes through
//! [`Dashboard::select_ticker`] / [`Dashboard::select_chart_kind`] and fetch
//! results through [`Dashboard::apply`].

use std::collections::BTreeSet;

use tracing::{debug, error, info};

use crate::data_source::{Endpoint, FetchError};
use crate::fetcher::{FetchOutcome, SourcePayload};
use crate::render::{self, RenderPlan};
use crate::selection::{FetchCycle, Selection};
use crate::viewport::Viewport;
use crate::{Candle, ChartKind, PredictionSeries, PriceSeries, Ticker};

/// Last successful payload per endpoint. Failures never clear an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCache {
    pub prices: Option<PriceSeries>,
    pub candles: Option<Vec<Candle>>,
    pub predictions: Option<PredictionSeries>,
}

impl DataCache {
    fn store(&mut self, payload: SourcePayload) {
        match payload {
            SourcePayload::Prices(prices) => self.prices = Some(prices),
            SourcePayload::Candles(candles) => self.candles = Some(candles),
            SourcePayload::Predictions(predictions) => self.predictions = Some(predictions),
        }
    }
}

/// How [`Dashboard::apply`] treated an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Stored,
    Failed,
    /// Outcome belongs to a superseded cycle and was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    selection: Selection,
    cache: DataCache,
    pending: BTreeSet<Endpoint>,
    last_error: Option<FetchError>,
    viewport: Viewport,
}

impl Dashboard {
    pub fn new(ticker: Ticker, chart_kind: ChartKind) -> Self {
        Self {
            selection: Selection::new(ticker, chart_kind),
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn ticker(&self) -> Ticker {
        self.selection.ticker()
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.selection.chart_kind()
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Endpoints of the current cycle that have not reported yet.
    pub fn pending(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_fetching(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Fetch cycle for the initial mount.
    pub fn initial_cycle(&mut self) -> FetchCycle {
        self.begin(self.selection.current_cycle())
    }

    /// Change ticker; returns the fetch cycle to start, if any.
    pub fn select_ticker(&mut self, ticker: Ticker) -> Option<FetchCycle> {
        let cycle = self.selection.set_ticker(ticker)?;
        info!(ticker = %ticker, generation = cycle.generation, "ticker selected");
        self.viewport.reset();
        Some(self.begin(cycle))
    }

    /// Change display mode. Never starts a fetch.
    pub fn select_chart_kind(&mut self, chart_kind: ChartKind) {
        if self.selection.set_chart_kind(chart_kind) {
            debug!(chart = %chart_kind, "chart kind selected");
            self.viewport.reset();
        }
    }

    pub fn next_ticker(&mut self) -> Option<FetchCycle> {
        self.select_ticker(self.ticker().next())
    }

    pub fn previous_ticker(&mut self) -> Option<FetchCycle> {
        self.select_ticker(self.ticker().previous())
    }

    pub fn next_chart_kind(&mut self) {
        self.select_chart_kind(self.chart_kind().next());
    }

    /// Fold one fetch outcome into the caches.
    ///
    /// Outcomes from an older generation are discarded. Errors are logged,
    /// remembered for the status line, and leave the cache untouched.
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApplyResult {
        if outcome.generation != self.selection.generation() {
            debug!(
                generation = outcome.generation,
                current = self.selection.generation(),
                endpoint = %outcome.endpoint,
                "dropping stale fetch outcome"
            );
            return ApplyResult::Stale;
        }

        self.pending.remove(&outcome.endpoint);
        match outcome.result {
            Ok(payload) => {
                debug!(endpoint = %outcome.endpoint, ticker = %outcome.ticker, "fetch stored");
                self.cache.store(payload);
                ApplyResult::Stored
            }
            Err(fetch_error) => {
                error!(
                    endpoint = %outcome.endpoint,
                    ticker = %outcome.ticker,
                    code = fetch_error.code(),
                    "error fetching {} data: {}",
                    outcome.endpoint,
                    fetch_error.message()
                );
                self.last_error = Some(fetch_error);
                ApplyResult::Failed
            }
        }
    }

    /// Chart plan for the current selection and cache.
    pub fn render_plan(&self) -> RenderPlan {
        render::plan(
            self.selection.chart_kind(),
            self.cache.prices.as_ref(),
            self.cache.candles.as_deref(),
            self.cache.predictions.as_ref(),
        )
    }

    fn begin(&mut self, cycle: FetchCycle) -> FetchCycle {
        self.pending = Endpoint::ALL.into_iter().collect();
        self.last_error = None;
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, UtcDateTime};

    fn outcome(
        generation: u64,
        endpoint: Endpoint,
        result: Result<SourcePayload, FetchError>,
    ) -> FetchOutcome {
        FetchOutcome {
            generation,
            ticker: Ticker::Aapl,
            endpoint,
            result,
        }
    }

    fn prices() -> SourcePayload {
        SourcePayload::Prices(PriceSeries::new(vec![
            PricePoint::new("a", 1.0).expect("finite"),
        ]))
    }

    fn candles() -> SourcePayload {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        SourcePayload::Candles(vec![Candle::new(ts, 1.0, 2.0, 0.5, 1.5).expect("finite")])
    }

    #[test]
    fn becomes_ready_once_prices_and_candles_arrive() {
        let mut dashboard = Dashboard::default();
        let cycle = dashboard.initial_cycle();
        assert!(dashboard.render_plan().is_loading());

        dashboard.apply(outcome(cycle.generation, Endpoint::Stock, Ok(prices())));
        assert!(dashboard.render_plan().is_loading());

        dashboard.apply(outcome(cycle.generation, Endpoint::Candlestick, Ok(candles())));
        assert!(!dashboard.render_plan().is_loading());
        assert_eq!(dashboard.pending().collect::<Vec<_>>(), vec![Endpoint::Predict]);
    }

    #[test]
    fn failure_keeps_previous_cache_and_records_error() {
        let mut dashboard = Dashboard::default();
        let cycle = dashboard.initial_cycle();
        dashboard.apply(outcome(cycle.generation, Endpoint::Stock, Ok(prices())));

        let result = dashboard.apply(outcome(
            cycle.generation,
            Endpoint::Stock,
            Err(FetchError::status(Endpoint::Stock, 500, false)),
        ));

        assert_eq!(result, ApplyResult::Failed);
        assert!(dashboard.cache().prices.is_some());
        assert_eq!(
            dashboard.last_error().map(FetchError::endpoint),
            Some(Endpoint::Stock)
        );
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut dashboard = Dashboard::default();
        let first = dashboard.initial_cycle();
        let second = dashboard.select_ticker(Ticker::Tsla).expect("new ticker");
        assert_ne!(first.generation, second.generation);

        let result = dashboard.apply(outcome(first.generation, Endpoint::Stock, Ok(prices())));

        assert_eq!(result, ApplyResult::Stale);
        assert_eq!(dashboard.cache().prices, None);
        assert_eq!(dashboard.pending().count(), 3);
    }

    #[test]
    fn chart_kind_switch_does_not_start_a_cycle() {
        let mut dashboard = Dashboard::default();
        dashboard.initial_cycle();
        dashboard.viewport_mut().zoom_in();

        dashboard.next_chart_kind();

        assert_eq!(dashboard.chart_kind(), ChartKind::Line);
        assert_eq!(dashboard.selection().generation(), 0);
        assert!(dashboard.viewport().is_full());
    }
}
