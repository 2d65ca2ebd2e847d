use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

use crate::error::ScrapeError;
use crate::scrapers::traits::PageFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Shared HTTP client for catalog pages. One fixed browser-identifying
/// header set, reused across all concurrent page fetches.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;

        response.text().await.map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetch catalog page `page_num` and return the detail-page URLs it links to,
/// in document order. A missing results container means the site layout has
/// changed and retrying is pointless, so it surfaces as a run-fatal error.
pub async fn scan_page(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    page_num: u32,
) -> Result<Vec<String>, ScrapeError> {
    info!("Scanning page #{page_num} of {base_url}");
    let catalog_url = format!("{base_url}?page={page_num}");
    let html = fetcher.fetch(&catalog_url).await?;
    parse_catalog_page(&html)
}

/// Pure parse step: locate `div#searchResults` and pull the primary link
/// out of each result card.
pub fn parse_catalog_page(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let results_selector = Selector::parse("div#searchResults").unwrap();
    let card_selector = Selector::parse("div.content-bar").unwrap();
    let link_selector = Selector::parse("a.m-link-ticket").unwrap();

    let results = document
        .select(&results_selector)
        .next()
        .ok_or_else(|| ScrapeError::StructuralParse("results container not located".to_string()))?;

    let mut urls = Vec::new();
    for card in results.select(&card_selector) {
        if let Some(href) = card
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
        {
            urls.push(href.to_string());
        }
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_card_links_in_document_order() {
        let html = r#"
            <html><body><div id="searchResults">
                <div class="content-bar"><a class="m-link-ticket" href="https://auto/1">one</a></div>
                <div class="content-bar"><a class="m-link-ticket" href="https://auto/2">two</a></div>
            </div></body></html>
        "#;

        let urls = parse_catalog_page(html).unwrap();
        assert_eq!(urls, vec!["https://auto/1", "https://auto/2"]);
    }

    #[test]
    fn empty_results_container_yields_no_urls() {
        let html = r#"<html><body><div id="searchResults"></div></body></html>"#;
        assert!(parse_catalog_page(html).unwrap().is_empty());
    }

    #[test]
    fn missing_results_container_is_structural_failure() {
        let html = r#"<html><body><div class="something-else"></div></body></html>"#;
        let err = parse_catalog_page(html).unwrap_err();
        assert!(matches!(err, ScrapeError::StructuralParse(_)));
    }
}
