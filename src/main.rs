mod config;
mod error;
mod normalize;
mod sink;
mod source;
mod stats;
mod sync;
mod types;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::normalize::Normalizer;
use crate::sink::{BackendSink, DryRunSink};
use crate::source::OpenSeaListings;
use crate::stats::StatsSnapshot;
use crate::sync::Syncer;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let s = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    // Run on its own task so a panic is reported and mapped to a failing exit.
    match tokio::spawn(run(s)).await {
        Ok(Ok(snap)) => {
            println!("{}", serde_json::to_string(&snap).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = ?e, "sync aborted");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "sync task panicked");
            ExitCode::FAILURE
        }
    }
}

async fn run(s: Settings) -> Result<StatsSnapshot> {
    tracing::info!(
        collection = %s.collection_address,
        chain = %s.chain,
        backend = %s.backend_url,
        page_size = s.page_size,
        dry_run = s.dry_run,
        "starting listing sync"
    );

    let source = OpenSeaListings::new(&s)?;
    let normalizer = Normalizer::new(s.marketplace_contract.clone());

    let snap = if s.dry_run {
        Syncer::new(source, DryRunSink::new(), normalizer)
            .with_delays(s.item_delay, s.page_delay)
            .run()
            .await
    } else {
        let sink = BackendSink::new(s.backend_url.clone())?;
        Syncer::new(source, sink, normalizer)
            .with_delays(s.item_delay, s.page_delay)
            .run()
            .await
    };

    Ok(snap)
}
