use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Runtime configuration, read once from the environment and handed to the
/// pipeline as an explicit record so nothing downstream touches env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base catalog URL; page index is appended as `?page={n}`.
    pub target_catalog_url: String,
    /// Catalog pages 1..=page_limit are scanned each run.
    pub page_limit: u32,
    /// "HH:MM"; the run aborts unless the local clock matches exactly.
    pub scheduled_start_time: String,
    /// JSON-lines listing store location.
    pub database_path: PathBuf,
    /// Cap on simultaneous in-flight catalog fetches.
    pub fetch_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let page_limit: u32 = std::env::var("PAGE_LIMIT")
            .context("PAGE_LIMIT is not set")?
            .parse()
            .context("PAGE_LIMIT is not a number")?;
        if page_limit == 0 {
            bail!("PAGE_LIMIT must be positive");
        }

        Ok(Self {
            target_catalog_url: std::env::var("TARGET_PAGE").context("TARGET_PAGE is not set")?,
            page_limit,
            scheduled_start_time: std::env::var("START_TIME").context("START_TIME is not set")?,
            database_path: std::env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("listings.jsonl")),
            fetch_concurrency: std::env::var("FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
        })
    }
}
