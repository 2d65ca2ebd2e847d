use std::thread;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::scrapers::traits::PageRenderer;

const CONSENT_SELECTOR: &str = "button.fc-cta-consent";
const REVEAL_PHONE_SELECTOR: &str = "a.phone_show_link";

/// Renders detail pages with a fresh headless Chrome per call.
///
/// Detail pages hide the seller's phone number behind a click, so a plain
/// HTTP fetch is not enough. Each call launches its own browser and lets it
/// drop on every exit path, which kills the Chrome process; items are
/// rendered one at a time, so at most one instance is ever alive.
pub struct ChromeRenderer {
    reveal_timeout: Duration,
    settle: Duration,
}

impl ChromeRenderer {
    pub fn new() -> Self {
        Self {
            reveal_timeout: Duration::from_secs(10),
            settle: Duration::from_secs(1),
        }
    }
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        let url = url.to_string();
        let reveal_timeout = self.reveal_timeout;
        let settle = self.settle;

        // headless_chrome is a blocking API; keep it off the async runtime.
        tokio::task::spawn_blocking(move || render_blocking(&url, reveal_timeout, settle))
            .await
            .map_err(|err| ScrapeError::Render(format!("render task panicked: {err}")))?
    }
}

fn render_blocking(
    url: &str,
    reveal_timeout: Duration,
    settle: Duration,
) -> Result<Option<String>, ScrapeError> {
    info!("Rendering item {url}");

    let options = LaunchOptions::default_builder()
        .headless(true)
        .build()
        .context("Failed to build launch options")?;
    let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

    let tab = browser
        .new_tab()
        .map_err(|err| ScrapeError::Render(format!("opening tab for {url}: {err}")))?;
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|err| ScrapeError::Render(format!("navigating to {url}: {err}")))?;

    // Consent overlay is only present for fresh sessions; absence is fine.
    if let Ok(consent) = tab.find_element(CONSENT_SELECTOR) {
        let _ = consent.click();
    }

    match tab.wait_for_element_with_custom_timeout(REVEAL_PHONE_SELECTOR, reveal_timeout) {
        Ok(reveal) => {
            if let Err(err) = reveal.click() {
                warn!("Reveal-phone click failed for {url}: {err}");
                return Ok(None);
            }
        }
        Err(err) => {
            warn!("Reveal-phone control not reachable for {url}: {err}");
            return Ok(None);
        }
    }

    // Give client-side scripts a moment to swap the revealed number in.
    thread::sleep(settle);

    let html = tab
        .get_content()
        .map_err(|err| ScrapeError::Render(format!("capturing content of {url}: {err}")))?;

    Ok(Some(html))
}
