//! Dashboard view.
//!
//! ```text
//! Stock Prediction Dashboard
//! ┌Select Stock──────────────────────────────────────┐
//! │ Apple (AAPL) │ Google (GOOGL) │ ...              │
//! └──────────────────────────────────────────────────┘
//! ┌Select Chart Type─────────────────────────────────┐
//! │ Candlestick │ Line │ Bar │ Scatter               │
//! └──────────────────────────────────────────────────┘
//! ┌Candlestick───────────────────────────────────────┐
//! │ chart                                            │
//! └──────────────────────────────────────────────────┘
//! status
//! key help
//! ```

mod candlestick;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Tabs};
use ratatui::Frame;
use stockdash_core::render::{tick_indices, MAX_TICKS};
use stockdash_core::{ChartData, ChartKind, Dashboard, OhlcPoint, RenderPlan, SeriesChart, Ticker};

use self::candlestick::CandlestickChart;

const PRICE_COLOR: Color = Color::Blue;
const PREDICTION_COLOR: Color = Color::Red;
const HIGHLIGHT: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MUTED: Style = Style::new().fg(Color::DarkGray);
/// Widest date label plus a gap.
const SERIES_LABEL_WIDTH: u16 = 12;
const HELP: &str =
    "t/T ticker  1-5 pick  c chart  \u{2190}/\u{2192} pan  +/- zoom  0 reset  q quit";

pub fn draw(frame: &mut Frame, dashboard: &Dashboard) {
    let [header, tickers, charts, body, status, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Stock Prediction Dashboard",
                Style::new().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(dashboard.ticker().label(), HIGHLIGHT),
        ])),
        header,
    );

    let ticker_titles: Vec<String> = Ticker::ALL.iter().map(|ticker| ticker.label()).collect();
    frame.render_widget(
        Tabs::new(ticker_titles)
            .block(Block::bordered().title("Select Stock"))
            .select(dashboard.ticker().index())
            .highlight_style(HIGHLIGHT),
        tickers,
    );

    let chart_titles: Vec<&str> = ChartKind::ALL.iter().map(|kind| kind.title()).collect();
    frame.render_widget(
        Tabs::new(chart_titles)
            .block(Block::bordered().title("Select Chart Type"))
            .select(dashboard.chart_kind().index())
            .highlight_style(HIGHLIGHT),
        charts,
    );

    draw_chart(frame, body, dashboard);
    frame.render_widget(status_line(dashboard), status);
    frame.render_widget(Paragraph::new(HELP).style(MUTED), help);
}

fn draw_chart(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::bordered().title(dashboard.chart_kind().title());

    match dashboard.render_plan() {
        RenderPlan::Loading => {
            frame.render_widget(Paragraph::new("Loading stock data...").block(block), area);
        }
        RenderPlan::Empty => frame.render_widget(block, area),
        RenderPlan::Chart {
            data: ChartData::Candles { points },
            ..
        } => {
            let range = dashboard.viewport().visible_range(points.len());
            let visible: &[OhlcPoint] = &points[range];
            frame.render_widget(CandlestickChart::new(visible).block(block), area);
        }
        RenderPlan::Chart {
            kind,
            data: ChartData::Series(series),
        } => {
            let window = series.window(dashboard.viewport().visible_range(series.len()));
            draw_series(frame, area, block, kind, &window);
        }
    }
}

fn draw_series(frame: &mut Frame, area: Rect, block: Block, kind: ChartKind, series: &SeriesChart) {
    let prices: Vec<(f64, f64)> = series
        .prices
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect();
    let predictions: Vec<(f64, f64)> = series
        .predictions
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|value| (i as f64, value)))
        .collect();

    let (graph_type, marker) = match kind {
        ChartKind::Bar => (GraphType::Bar, Marker::HalfBlock),
        ChartKind::Scatter => (GraphType::Scatter, Marker::Dot),
        ChartKind::Line | ChartKind::Candlestick => (GraphType::Line, Marker::Braille),
    };

    let datasets = vec![
        Dataset::default()
            .name("Stock Price")
            .marker(marker)
            .graph_type(graph_type)
            .style(Style::new().fg(PRICE_COLOR))
            .data(&prices),
        Dataset::default()
            .name("Predictions")
            .marker(Marker::Dot)
            .graph_type(graph_type)
            .style(Style::new().fg(PREDICTION_COLOR))
            .data(&predictions),
    ];

    let (min_y, max_y) = padded_bounds(series.value_bounds());
    let max_x = series.len().saturating_sub(1).max(1) as f64;
    let label_budget = usize::from(area.width / SERIES_LABEL_WIDTH).clamp(2, MAX_TICKS);
    let x_labels: Vec<Span> = tick_indices(series.len(), label_budget)
        .into_iter()
        .map(|index| Span::raw(series.labels[index].clone()))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(MUTED)
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Price")
                .style(MUTED)
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{min_y:.2}")),
                    Span::raw(format!("{:.2}", (min_y + max_y) / 2.0)),
                    Span::raw(format!("{max_y:.2}")),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Add 2% headroom; flat series get a unit band so the axis is not empty.
fn padded_bounds(bounds: Option<(f64, f64)>) -> (f64, f64) {
    match bounds {
        None => (0.0, 1.0),
        Some((min, max)) if max - min <= f64::EPSILON => (min - 1.0, max + 1.0),
        Some((min, max)) => {
            let margin = (max - min) * 0.02;
            (min - margin, max + margin)
        }
    }
}

fn status_line(dashboard: &Dashboard) -> Paragraph<'static> {
    let mut spans = Vec::new();

    if dashboard.is_fetching() {
        let pending: Vec<&str> = dashboard.pending().map(|endpoint| endpoint.as_str()).collect();
        spans.push(Span::styled(
            format!("fetching {}", pending.join(", ")),
            Style::new().fg(Color::Cyan),
        ));
    } else {
        spans.push(Span::styled("ready", Style::new().fg(Color::Green)));
    }

    if let Some(points) = dashboard.cache().prices.as_ref().map(|prices| prices.len()) {
        let range = dashboard.viewport().visible_range(points);
        spans.push(Span::styled(
            format!("  {}-{} of {points} closes", range.start + 1, range.end),
            MUTED,
        ));
    }

    if let Some(error) = dashboard.last_error() {
        spans.push(Span::styled(
            format!("  {error}"),
            Style::new().fg(Color::Red),
        ));
    }

    Paragraph::new(Line::from(spans))
}
