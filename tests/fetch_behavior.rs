//! Behavior tests for the fetch pipeline.
//!
//! These drive the real `HttpPredictionApi` and `Fetcher` against an
//! in-memory HTTP client and check which requests go out and which results
//! are allowed to reach the dashboard.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockdash_core::{
    ApplyResult, ChartKind, Dashboard, Endpoint, FetchErrorKind, FetchOutcome, Fetcher,
    HttpClient, HttpError, HttpPredictionApi, HttpRequest, HttpResponse, Ticker,
};
use tokio::sync::mpsc::UnboundedReceiver;

const BASE_URL: &str = "http://api.test";

/// Answers each endpoint with a canned body derived from the ticker.
#[derive(Default)]
struct FakeServer {
    calls: Mutex<Vec<String>>,
    /// Requests for this ticker never complete.
    stalled: Option<Ticker>,
    /// Status returned for `/predict/*` instead of a body.
    predict_status: Option<u16>,
}

impl FakeServer {
    fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().expect("call log poisoned").clone();
        calls.sort();
        calls
    }

    fn respond(&self, url: &str) -> HttpResponse {
        let price = if url.ends_with("/TSLA") { 200.0 } else { 100.0 };

        if url.contains("/stock/") {
            HttpResponse::ok_json(format!(
                r#"{{"ticker":"X","Close":{{"2025-01-02":{},"2025-01-03":{}}}}}"#,
                price,
                price + 1.0
            ))
        } else if url.contains("/candlestick/") {
            HttpResponse::ok_json(format!(
                r#"{{"ticker":"X","candlestick":[{{"Datetime":"2025-01-03 09:30:00-05:00","Open":{p},"High":{h},"Low":{l},"Close":{p}}}]}}"#,
                p = price,
                h = price + 2.0,
                l = price - 2.0
            ))
        } else if let Some(status) = self.predict_status {
            HttpResponse::with_status(status, "{}")
        } else {
            HttpResponse::ok_json(format!(r#"{{"ticker":"X","predictions":[[{}]]}}"#, price + 5.0))
        }
    }
}

impl HttpClient for FakeServer {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(request.url.clone());

        let stalled = self
            .stalled
            .is_some_and(|ticker| request.url.ends_with(&format!("/{ticker}")));
        let response = self.respond(&request.url);
        Box::pin(async move {
            if stalled {
                std::future::pending::<()>().await;
            }
            Ok(response)
        })
    }
}

fn fetcher_for(server: &Arc<FakeServer>) -> (Fetcher, UnboundedReceiver<FetchOutcome>) {
    let api = HttpPredictionApi::new(BASE_URL, Arc::clone(server) as Arc<dyn HttpClient>);
    Fetcher::new(Arc::new(api))
}

async fn next_outcome(rx: &mut UnboundedReceiver<FetchOutcome>) -> FetchOutcome {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("fetch outcome should arrive")
        .expect("channel stays open while the fetcher lives")
}

async fn drain_cycle(dashboard: &mut Dashboard, rx: &mut UnboundedReceiver<FetchOutcome>) {
    while dashboard.is_fetching() {
        let outcome = next_outcome(rx).await;
        dashboard.apply(outcome);
    }
}

// =============================================================================
// Request fan-out
// =============================================================================

#[tokio::test]
async fn when_a_ticker_is_selected_each_endpoint_is_called_exactly_once() {
    // Given: a dashboard on MSFT
    let server = Arc::new(FakeServer::default());
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::new(Ticker::Msft, ChartKind::Line);

    // When: the initial fetch cycle runs to completion
    fetcher.start(dashboard.initial_cycle());
    drain_cycle(&mut dashboard, &mut rx).await;

    // Then: one request per endpoint, each carrying the ticker in its path
    assert_eq!(
        server.calls(),
        vec![
            "http://api.test/candlestick/MSFT",
            "http://api.test/predict/MSFT",
            "http://api.test/stock/MSFT",
        ]
    );
    assert!(!dashboard.render_plan().is_loading());
}

#[tokio::test]
async fn when_the_chart_kind_changes_no_request_is_made() {
    // Given: a fully loaded dashboard
    let server = Arc::new(FakeServer::default());
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::default();
    fetcher.start(dashboard.initial_cycle());
    drain_cycle(&mut dashboard, &mut rx).await;
    let before = server.calls().len();

    // When: the user walks through every chart kind
    for _ in ChartKind::ALL {
        dashboard.next_chart_kind();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Then: nothing new was requested and the data is still there
    assert_eq!(server.calls().len(), before);
    assert!(!dashboard.is_fetching());
    assert!(dashboard.cache().prices.is_some());
}

#[tokio::test]
async fn when_the_same_ticker_is_reselected_no_request_is_made() {
    let server = Arc::new(FakeServer::default());
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::default();
    fetcher.start(dashboard.initial_cycle());
    drain_cycle(&mut dashboard, &mut rx).await;

    assert!(dashboard.select_ticker(Ticker::Aapl).is_none());
    assert_eq!(server.calls().len(), 3);
}

// =============================================================================
// Superseded cycles
// =============================================================================

#[tokio::test]
async fn when_the_ticker_changes_mid_flight_the_old_cycle_is_abandoned() {
    // Given: AAPL requests that never complete
    let server = Arc::new(FakeServer {
        stalled: Some(Ticker::Aapl),
        ..FakeServer::default()
    });
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::default();
    fetcher.start(dashboard.initial_cycle());

    // When: the user switches to TSLA before AAPL answers
    let cycle = dashboard.select_ticker(Ticker::Tsla).expect("ticker changed");
    fetcher.start(cycle);
    drain_cycle(&mut dashboard, &mut rx).await;

    // Then: TSLA data is shown and the AAPL tasks were torn down
    let prices = dashboard.cache().prices.as_ref().expect("prices stored");
    assert_eq!(prices.values(), vec![200.0, 201.0]);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(fetcher.pending_tasks(), 0);
    assert!(rx.try_recv().is_err(), "no AAPL outcome should ever arrive");
}

#[tokio::test]
async fn when_results_of_a_previous_ticker_arrive_late_they_are_discarded() {
    // Given: AAPL results that have already landed in the channel
    let server = Arc::new(FakeServer::default());
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::default();
    fetcher.start(dashboard.initial_cycle());
    let mut late = Vec::new();
    for _ in Endpoint::ALL {
        late.push(next_outcome(&mut rx).await);
    }

    // When: TSLA is selected before they are applied
    let cycle = dashboard.select_ticker(Ticker::Tsla).expect("ticker changed");
    fetcher.start(cycle);

    // Then: every AAPL outcome is reported stale and the caches stay empty
    for outcome in late {
        assert_eq!(outcome.ticker, Ticker::Aapl);
        assert_eq!(dashboard.apply(outcome), ApplyResult::Stale);
    }
    assert!(dashboard.cache().prices.is_none());

    drain_cycle(&mut dashboard, &mut rx).await;
    let candles = dashboard.cache().candles.as_ref().expect("candles stored");
    assert_eq!(candles[0].open, 200.0);
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn when_predictions_fail_the_chart_still_renders_without_overlay() {
    // Given: a server whose prediction endpoint is down
    let server = Arc::new(FakeServer {
        predict_status: Some(503),
        ..FakeServer::default()
    });
    let (mut fetcher, mut rx) = fetcher_for(&server);
    let mut dashboard = Dashboard::new(Ticker::Amzn, ChartKind::Line);

    // When: the cycle completes
    fetcher.start(dashboard.initial_cycle());
    drain_cycle(&mut dashboard, &mut rx).await;

    // Then: the error is recorded, the chart renders, and no retry was made
    let error = dashboard.last_error().expect("error recorded");
    assert_eq!(error.kind(), FetchErrorKind::Status);
    assert_eq!(error.endpoint(), Endpoint::Predict);
    assert!(!dashboard.render_plan().is_loading());
    assert!(dashboard.cache().predictions.is_none());
    assert_eq!(server.calls().len(), 3);
}
