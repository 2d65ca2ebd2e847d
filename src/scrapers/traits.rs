use async_trait::async_trait;

use crate::error::ScrapeError;

/// Fetches one catalog page body over plain HTTP.
/// Split out as a trait so the pipeline can run against canned HTML in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Renders one detail page in a scriptable browser.
///
/// `Ok(None)` means the page could not be brought to its revealed state
/// (interaction timeout, blocked element); the caller skips the item.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<Option<String>, ScrapeError>;
}
