//! Per-endpoint fetch tasks.
//!
//! Each [`FetchCycle`] spawns one tokio task per [`Endpoint`]. Tasks report on
//! an unbounded channel and never wait on each other. Starting a new cycle
//! aborts whatever the previous cycle still has in flight.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::data_source::{Endpoint, FetchError, PredictionApi};
use crate::selection::{FetchCycle, Generation};
use crate::{Candle, PredictionSeries, PriceSeries, Ticker};

/// Successful payload of one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    Prices(PriceSeries),
    Candles(Vec<Candle>),
    Predictions(PredictionSeries),
}

/// Result of one endpoint task, tagged with the cycle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub generation: Generation,
    pub ticker: Ticker,
    pub endpoint: Endpoint,
    pub result: Result<SourcePayload, FetchError>,
}

pub struct Fetcher {
    api: Arc<dyn PredictionApi>,
    tx: UnboundedSender<FetchOutcome>,
    in_flight: Vec<JoinHandle<()>>,
}

impl Fetcher {
    pub fn new(api: Arc<dyn PredictionApi>) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            api,
            tx,
            in_flight: Vec::new(),
        };
        (fetcher, rx)
    }

    /// Abort the previous cycle and spawn the three endpoint tasks for `cycle`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, cycle: FetchCycle) {
        self.cancel();
        debug!(generation = cycle.generation, ticker = %cycle.ticker, "starting fetch cycle");

        for endpoint in Endpoint::ALL {
            let api = Arc::clone(&self.api);
            let tx = self.tx.clone();
            let handle = tokio::spawn(async move {
                let result = fetch_endpoint(api.as_ref(), endpoint, cycle.ticker).await;
                let _ = tx.send(FetchOutcome {
                    generation: cycle.generation,
                    ticker: cycle.ticker,
                    endpoint,
                    result,
                });
            });
            self.in_flight.push(handle);
        }
    }

    /// Abort every unfinished task of the current cycle.
    pub fn cancel(&mut self) {
        for handle in self.in_flight.drain(..) {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }

    pub fn pending_tasks(&self) -> usize {
        self.in_flight
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn fetch_endpoint(
    api: &dyn PredictionApi,
    endpoint: Endpoint,
    ticker: Ticker,
) -> Result<SourcePayload, FetchError> {
    match endpoint {
        Endpoint::Stock => api.price_series(ticker).await.map(SourcePayload::Prices),
        Endpoint::Candlestick => api.candlesticks(ticker).await.map(SourcePayload::Candles),
        Endpoint::Predict => api.predictions(ticker).await.map(SourcePayload::Predictions),
    }
}
