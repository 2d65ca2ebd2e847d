use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Local, NaiveTime};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::ScrapeError;
use crate::scrapers::catalog;
use crate::scrapers::extract::{extract_listing, Extraction};
use crate::scrapers::normalize::normalize;
use crate::scrapers::traits::{PageFetcher, PageRenderer};
use crate::storage::{InsertOutcome, ListingStore};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub inserted: usize,
    pub inactive: usize,
    pub duplicates: usize,
    pub failed: usize,
}

enum ItemOutcome {
    Stored,
    Inactive,
    NoDocument,
    DuplicateKey,
}

/// Drives one end-to-end run: schedule gate, dedup-set load, concurrent
/// catalog discovery, then strictly sequential per-item extraction.
pub struct Pipeline<S, F, R> {
    config: Config,
    store: S,
    fetcher: Arc<F>,
    renderer: R,
}

impl<S, F, R> Pipeline<S, F, R>
where
    S: ListingStore,
    F: PageFetcher + 'static,
    R: PageRenderer,
{
    pub fn new(config: Config, store: S, fetcher: F, renderer: R) -> Self {
        Self {
            config,
            store,
            fetcher: Arc::new(fetcher),
            renderer,
        }
    }

    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        self.run_at(Local::now().time()).await
    }

    /// Entry point with an explicit clock reading, so the schedule gate is
    /// testable without waiting for the wall clock.
    pub(crate) async fn run_at(&self, now: NaiveTime) -> Result<RunSummary, ScrapeError> {
        let actual = now.format("%H:%M").to_string();
        if actual != self.config.scheduled_start_time {
            return Err(ScrapeError::ScheduleMismatch {
                expected: self.config.scheduled_start_time.clone(),
                actual,
            });
        }

        let known = self.store.known_urls().await?;
        let queue = self.discover(&known).await?;
        info!("Found {} new items.", queue.len());

        let mut summary = RunSummary {
            discovered: queue.len(),
            ..RunSummary::default()
        };

        for url in &queue {
            match self.process_item(url).await {
                Ok(ItemOutcome::Stored) => summary.inserted += 1,
                Ok(ItemOutcome::Inactive) => summary.inactive += 1,
                Ok(ItemOutcome::NoDocument) => summary.failed += 1,
                Ok(ItemOutcome::DuplicateKey) => summary.duplicates += 1,
                Err(err) => {
                    error!("Skipping item {url}: {err}");
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Run complete: {} stored, {} inactive, {} duplicate, {} failed of {} discovered.",
            summary.inserted, summary.inactive, summary.duplicates, summary.failed, summary.discovered
        );
        Ok(summary)
    }

    /// Scan catalog pages 1..=limit concurrently and merge the results into
    /// an ordered queue, dropping URLs already stored or already queued.
    /// Any structural failure aborts discovery outright.
    async fn discover(&self, known: &HashSet<String>) -> Result<Vec<String>, ScrapeError> {
        let semaphore = Arc::new(Semaphore::new(self.config.fetch_concurrency));
        let mut scans = JoinSet::new();

        for page_num in 1..=self.config.page_limit {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            let base_url = self.config.target_catalog_url.clone();
            scans.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                catalog::scan_page(fetcher.as_ref(), &base_url, page_num).await
            });
        }

        let mut queue = Vec::new();
        let mut queued = HashSet::new();
        while let Some(joined) = scans.join_next().await {
            let page_urls =
                joined.map_err(|err| ScrapeError::Other(anyhow!("catalog scan task failed: {err}")))??;
            for url in page_urls {
                if !known.contains(&url) && queued.insert(url.clone()) {
                    queue.push(url);
                }
            }
        }

        Ok(queue)
    }

    async fn process_item(&self, url: &str) -> Result<ItemOutcome, ScrapeError> {
        let Some(html) = self.renderer.render(url).await? else {
            warn!("No document for item {url}, skipping.");
            return Ok(ItemOutcome::NoDocument);
        };

        match extract_listing(&html, url)? {
            Extraction::Inactive => {
                info!("Item {url} is not active, skipping.");
                Ok(ItemOutcome::Inactive)
            }
            Extraction::Fields(raw) => {
                let listing = normalize(raw, local_timestamp())?;
                match self.store.insert(&listing).await? {
                    InsertOutcome::Inserted => Ok(ItemOutcome::Stored),
                    InsertOutcome::Duplicate => {
                        warn!("Item {url} already stored, skipping.");
                        Ok(ItemOutcome::DuplicateKey)
                    }
                }
            }
        }
    }
}

fn local_timestamp() -> String {
    Local::now().format("%d/%m/%Y %H:%M").to_string()
}
