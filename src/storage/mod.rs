//! Listing persistence behind a small collaborator trait.
//!
//! The pipeline only needs two capabilities: bulk-load the set of already
//! known URLs at run start, and commit one new listing at a time. Duplicate
//! keys surface as an explicit outcome instead of an error so the caller can
//! treat them as an item-level skip.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::models::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The primary key already existed; nothing was written.
    Duplicate,
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Snapshot of every stored listing URL, loaded once per run.
    async fn known_urls(&self) -> Result<HashSet<String>>;

    /// Insert and commit a single listing.
    async fn insert(&self, listing: &Listing) -> Result<InsertOutcome>;
}

/// Append-only JSON-lines store. Each insert appends one serialized listing
/// and flushes before returning, so a crash mid-run loses at most the
/// in-flight item.
pub struct JsonlStore {
    path: PathBuf,
    seen: Mutex<HashSet<String>>,
}

impl JsonlStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut seen = HashSet::new();

        if fs::try_exists(&path)
            .await
            .with_context(|| format!("checking store path {}", path.display()))?
        {
            let contents = fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading store {}", path.display()))?;
            for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                let listing: Listing = serde_json::from_str(line)
                    .with_context(|| format!("corrupt store line in {}", path.display()))?;
                seen.insert(listing.url);
            }
        }

        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }
}

#[async_trait]
impl ListingStore for JsonlStore {
    async fn known_urls(&self) -> Result<HashSet<String>> {
        Ok(self.seen.lock().await.clone())
    }

    async fn insert(&self, listing: &Listing) -> Result<InsertOutcome> {
        let mut seen = self.seen.lock().await;
        if seen.contains(&listing.url) {
            return Ok(InsertOutcome::Duplicate);
        }

        let mut line = serde_json::to_string(listing).context("serializing listing")?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening store {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("appending to store {}", self.path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("flushing store {}", self.path.display()))?;

        seen.insert(listing.url.clone());
        Ok(InsertOutcome::Inserted)
    }
}
