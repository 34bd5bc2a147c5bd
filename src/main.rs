use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use carscout::{
    engine::{ExtractMode, ListingEngine},
    fetcher::HttpFetcher,
};

/// Extract used-car listings from a page and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "carscout", version)]
struct Args {
    /// Page to extract from (http or https)
    url: String,

    /// Extractor family: auto, catalog or detail
    #[arg(default_value = "auto")]
    mode: ExtractMode,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let engine = ListingEngine::new(Arc::new(fetcher));

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = engine.run(&args.url, args.mode).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
