//! Behavior tests for turning API payloads into chart datasets.
//!
//! Payloads go through the same parsers the HTTP adapter uses, then into a
//! `Dashboard`, and the resulting `RenderPlan` is inspected.

use stockdash_core::adapters::{parse_candlesticks, parse_predictions, parse_price_series};
use stockdash_core::{
    ChartData, ChartKind, Dashboard, Endpoint, FetchErrorKind, FetchOutcome, RenderPlan,
    SeriesChart, SourcePayload, Ticker,
};

const CLOSES: &str = r#"{"ticker":"AAPL","Close":{"a":1,"b":2,"c":3}}"#;
const CANDLES: &str = r#"{"ticker":"AAPL","candlestick":[
    {"Datetime":"2025-0203 bad","Open":1,"High":1,"Low":1,"Close":1},
    {"Datetime":"2025-02-03 09:30:00-05:00","Open":230.5,"High":231.25,"Low":229.75,"Close":230.0},
    {"Datetime":"2025-02-03 09:35:00-05:00","Open":230.0,"High":232.0,"Low":229.5,"Close":231.5}
]}"#;

fn loaded_dashboard(kind: ChartKind, closes: &str, candles: &str, predictions: &str) -> Dashboard {
    let mut dashboard = Dashboard::new(Ticker::Aapl, kind);
    let cycle = dashboard.initial_cycle();

    let results = [
        (Endpoint::Stock, parse_price_series(closes).map(SourcePayload::Prices)),
        (Endpoint::Candlestick, parse_candlesticks(candles).map(SourcePayload::Candles)),
        (Endpoint::Predict, parse_predictions(predictions).map(SourcePayload::Predictions)),
    ];
    for (endpoint, result) in results {
        dashboard.apply(FetchOutcome {
            generation: cycle.generation,
            ticker: cycle.ticker,
            endpoint,
            result,
        });
    }
    dashboard
}

fn series(plan: RenderPlan) -> SeriesChart {
    match plan {
        RenderPlan::Chart {
            data: ChartData::Series(series),
            ..
        } => series,
        other => panic!("expected a series chart, got {other:?}"),
    }
}

// =============================================================================
// Line / bar / scatter datasets
// =============================================================================

#[test]
fn when_closes_arrive_labels_and_values_keep_the_payload_order() {
    // Given: closes {a:1, b:2, c:3} and no predictions
    let dashboard = loaded_dashboard(ChartKind::Line, CLOSES, CANDLES, r#"{"predictions":[]}"#);

    // When: the line chart is planned
    let chart = series(dashboard.render_plan());

    // Then: labels and values follow the object order
    assert_eq!(chart.labels, vec!["a", "b", "c"]);
    assert_eq!(chart.prices, vec![1.0, 2.0, 3.0]);
    assert_eq!(chart.predictions, vec![None, None, None]);
}

#[test]
fn when_fewer_predictions_than_closes_they_align_to_the_last_points() {
    let closes = r#"{"Close":{"d1":10,"d2":11,"d3":12,"d4":13,"d5":14}}"#;
    let dashboard = loaded_dashboard(ChartKind::Bar, closes, CANDLES, r#"{"predictions":[[15.0],[16.0]]}"#);

    let chart = series(dashboard.render_plan());

    assert_eq!(chart.predictions, vec![None, None, None, Some(15.0), Some(16.0)]);
}

#[test]
fn when_more_predictions_than_closes_only_the_trailing_ones_are_kept() {
    let dashboard =
        loaded_dashboard(ChartKind::Scatter, CLOSES, CANDLES, r#"{"predictions":[7,8,9,10]}"#);

    let chart = series(dashboard.render_plan());

    assert_eq!(chart.predictions, vec![Some(8.0), Some(9.0), Some(10.0)]);
}

#[test]
fn when_zoomed_the_series_window_shrinks_around_the_center() {
    let closes: String = {
        let entries: Vec<String> = (0..100).map(|i| format!(r#""d{i:03}":{i}"#)).collect();
        format!(r#"{{"Close":{{{}}}}}"#, entries.join(","))
    };
    let mut dashboard =
        loaded_dashboard(ChartKind::Line, &closes, CANDLES, r#"{"predictions":[]}"#);

    dashboard.viewport_mut().zoom_in();
    let chart = series(dashboard.render_plan());
    let window = chart.window(dashboard.viewport().visible_range(chart.len()));

    assert_eq!(window.len(), 80);
    assert_eq!(window.labels.first().map(String::as_str), Some("d010"));

    dashboard.viewport_mut().pan_left();
    dashboard.viewport_mut().pan_left();
    let range = dashboard.viewport().visible_range(chart.len());
    assert_eq!(range.start, 0);
}

// =============================================================================
// Candlestick datasets
// =============================================================================

#[test]
fn when_candles_arrive_timestamps_become_utc_and_prices_are_untouched() {
    // Given: one malformed and two valid candle records
    let dashboard =
        loaded_dashboard(ChartKind::Candlestick, CLOSES, CANDLES, r#"{"predictions":[]}"#);

    // When: the candlestick chart is planned
    let RenderPlan::Chart {
        data: ChartData::Candles { points },
        ..
    } = dashboard.render_plan()
    else {
        panic!("expected a candlestick chart");
    };

    // Then: the malformed record is skipped and OHLC values pass through
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].x.format_rfc3339(), "2025-02-03T14:30:00Z");
    assert_eq!(
        (points[0].o, points[0].h, points[0].l, points[0].c),
        (230.5, 231.25, 229.75, 230.0)
    );
    assert!(points[1].is_bullish());
}

#[test]
fn when_the_candle_list_is_empty_the_candlestick_chart_draws_nothing() {
    let dashboard = loaded_dashboard(
        ChartKind::Candlestick,
        CLOSES,
        r#"{"candlestick":[]}"#,
        r#"{"predictions":[]}"#,
    );

    assert_eq!(dashboard.render_plan(), RenderPlan::Empty);

    let mut dashboard = dashboard;
    dashboard.select_chart_kind(ChartKind::Line);
    assert_eq!(series(dashboard.render_plan()).labels, vec!["a", "b", "c"]);
}

#[test]
fn when_the_candlestick_field_is_missing_the_chart_stays_loading() {
    // Given: a candlestick payload without the `candlestick` key
    let dashboard = loaded_dashboard(
        ChartKind::Candlestick,
        CLOSES,
        r#"{"ticker":"AAPL"}"#,
        r#"{"predictions":[]}"#,
    );

    // Then: no chart is drawn, nothing panics, and the failure is recorded
    assert!(dashboard.render_plan().is_loading());
    let error = dashboard.last_error().expect("missing field recorded");
    assert_eq!(error.kind(), FetchErrorKind::MissingField);
    assert_eq!(error.endpoint(), Endpoint::Candlestick);
    assert!(!dashboard.is_fetching());
}

#[test]
fn when_closes_are_malformed_every_chart_kind_stays_loading() {
    let mut dashboard =
        loaded_dashboard(ChartKind::Line, r#"{"Close":"n/a"}"#, CANDLES, r#"{"predictions":[]}"#);

    for kind in ChartKind::ALL {
        dashboard.select_chart_kind(kind);
        assert!(dashboard.render_plan().is_loading(), "{kind} should be loading");
    }
    assert_eq!(
        dashboard.last_error().map(|error| error.kind()),
        Some(FetchErrorKind::Decode)
    );
}
