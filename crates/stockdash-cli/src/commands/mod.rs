mod dashboard;
mod snapshot;

use std::process::ExitCode;
use std::sync::Arc;

use stockdash_core::{HttpPredictionApi, PredictionApi, ReqwestHttpClient, RetryConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli, command: Command) -> Result<ExitCode, CliError> {
    let api = build_api(cli);
    match command {
        Command::Tui(args) => dashboard::run(api, &args).await,
        Command::Snapshot(args) => snapshot::run(api, &args).await,
    }
}

fn build_api(cli: &Cli) -> Arc<dyn PredictionApi> {
    let retry = if cli.retries == 0 {
        RetryConfig::no_retry()
    } else {
        RetryConfig::exponential(cli.retries)
    };

    Arc::new(
        HttpPredictionApi::new(cli.base_url.clone(), Arc::new(ReqwestHttpClient::default()))
            .with_timeout_ms(cli.timeout_ms)
            .with_retry(retry),
    )
}
