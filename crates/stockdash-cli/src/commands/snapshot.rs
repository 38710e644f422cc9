use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use stockdash_core::{
    ChartKind, Dashboard, Endpoint, FetchError, Fetcher, PredictionApi, RenderPlan, Ticker,
    UtcDateTime,
};
use tracing::info;

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub ticker: Ticker,
    pub company: &'static str,
    pub chart: ChartKind,
    pub generated_at: UtcDateTime,
    pub plan: RenderPlan,
    pub errors: Vec<SnapshotError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotError {
    pub endpoint: Endpoint,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl From<&FetchError> for SnapshotError {
    fn from(error: &FetchError) -> Self {
        Self {
            endpoint: error.endpoint(),
            code: error.code(),
            message: error.message().to_owned(),
            retryable: error.retryable(),
        }
    }
}

pub async fn run(api: Arc<dyn PredictionApi>, args: &SnapshotArgs) -> Result<ExitCode, CliError> {
    let snapshot = collect(api, args.ticker, args.chart).await;
    output::render(&snapshot, args.pretty)?;

    if !snapshot.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }
    Ok(ExitCode::SUCCESS)
}

/// Run one fetch cycle to completion and capture what the chart would show.
pub async fn collect(api: Arc<dyn PredictionApi>, ticker: Ticker, chart: ChartKind) -> Snapshot {
    let mut dashboard = Dashboard::new(ticker, chart);
    let (mut fetcher, mut outcomes) = Fetcher::new(api);
    fetcher.start(dashboard.initial_cycle());

    let mut errors = Vec::new();
    while dashboard.is_fetching() {
        let Some(outcome) = outcomes.recv().await else {
            break;
        };
        if let Err(error) = &outcome.result {
            errors.push(SnapshotError::from(error));
        }
        dashboard.apply(outcome);
    }
    errors.sort_by_key(|error| error.endpoint);

    let plan = dashboard.render_plan();
    info!(ticker = %ticker, chart = %chart, errors = errors.len(), "snapshot collected");

    Snapshot {
        ticker,
        company: ticker.company(),
        chart,
        generated_at: UtcDateTime::now(),
        plan,
        errors,
    }
}
