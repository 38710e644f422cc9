use serde::Serialize;

use crate::{ChartKind, Ticker};

/// Monotonic counter bumped on every ticker change.
pub type Generation = u64;

/// A fetch round for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchCycle {
    pub generation: Generation,
    pub ticker: Ticker,
}

/// Ticker and display mode chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    ticker: Ticker,
    chart_kind: ChartKind,
    generation: Generation,
}

impl Selection {
    pub fn new(ticker: Ticker, chart_kind: ChartKind) -> Self {
        Self {
            ticker,
            chart_kind,
            generation: 0,
        }
    }

    pub fn ticker(&self) -> Ticker {
        self.ticker
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_cycle(&self) -> FetchCycle {
        FetchCycle {
            generation: self.generation,
            ticker: self.ticker,
        }
    }

    /// Switch ticker. Returns the new fetch cycle, or `None` when `ticker`
    /// is already selected.
    pub fn set_ticker(&mut self, ticker: Ticker) -> Option<FetchCycle> {
        if ticker == self.ticker {
            return None;
        }

        self.ticker = ticker;
        self.generation = self.generation.wrapping_add(1);
        Some(self.current_cycle())
    }

    /// Switch display mode. Never starts a fetch.
    pub fn set_chart_kind(&mut self, chart_kind: ChartKind) -> bool {
        let changed = chart_kind != self.chart_kind;
        self.chart_kind = chart_kind;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_change_bumps_generation() {
        let mut selection = Selection::default();
        assert_eq!(selection.ticker(), Ticker::Aapl);
        assert_eq!(selection.chart_kind(), ChartKind::Candlestick);

        let cycle = selection.set_ticker(Ticker::Tsla).expect("new ticker");
        assert_eq!(cycle, FetchCycle { generation: 1, ticker: Ticker::Tsla });
    }

    #[test]
    fn reselecting_the_same_ticker_is_a_no_op() {
        let mut selection = Selection::new(Ticker::Msft, ChartKind::Line);
        assert_eq!(selection.set_ticker(Ticker::Msft), None);
        assert_eq!(selection.generation(), 0);
    }

    #[test]
    fn chart_kind_change_keeps_generation() {
        let mut selection = Selection::default();
        assert!(selection.set_chart_kind(ChartKind::Bar));
        assert!(!selection.set_chart_kind(ChartKind::Bar));
        assert_eq!(selection.generation(), 0);
    }
}
