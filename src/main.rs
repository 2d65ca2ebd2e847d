mod config;
mod error;
mod models;
mod pipeline;
mod scrapers;
mod storage;

use config::Config;
use pipeline::Pipeline;
use scrapers::{ChromeRenderer, HttpPageFetcher};
use storage::JsonlStore;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Config::from_env()?;
    info!(
        "Car Scout: scanning {} catalog pages of {}",
        config.page_limit, config.target_catalog_url
    );

    let store = JsonlStore::open(&config.database_path).await?;
    let fetcher = HttpPageFetcher::new()?;
    let renderer = ChromeRenderer::new();

    let pipeline = Pipeline::new(config, store, fetcher, renderer);
    let summary = pipeline.run().await?;

    info!("Stored {} new listings.", summary.inserted);
    Ok(())
}
