//! Concurrent nutrition label fetching
//!
//! One task per distinct new URL, bounded by a semaphore. Results are
//! collected in completion order. A task that fails (network error, bad
//! status, panic) is logged and its food dropped; siblings keep running.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::domain::food::NutritionFacts;
use crate::domain::menu::MenuRecord;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::NutritionParser;

/// A menu record together with the label scraped for it
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFood {
    pub record: MenuRecord,
    pub facts: NutritionFacts,
}

impl EnrichedFood {
    /// Catalog row; the menu name stands in when the label page has none
    pub fn into_catalog_entry(self) -> NutritionFacts {
        let EnrichedFood { record, mut facts } = self;
        if facts.name.is_empty() {
            facts.name = record.name;
        }
        facts
    }
}

pub struct NutritionFetcher {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<NutritionParser>,
    max_concurrent: usize,
}

impl NutritionFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: NutritionParser, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            parser: Arc::new(parser),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetch and parse labels for `records`; output holds only the successes
    pub async fn fetch_all(&self, records: &[MenuRecord]) -> Vec<EnrichedFood> {
        let mut seen = HashSet::new();
        let unique: Vec<&MenuRecord> = records.iter().filter(|r| seen.insert(r.url.as_str())).collect();
        if unique.is_empty() {
            return Vec::new();
        }

        debug!("Fetching nutrition for {} new foods", unique.len());

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = FuturesUnordered::new();

        for record in unique {
            let fetcher = Arc::clone(&self.fetcher);
            let parser = Arc::clone(&self.parser);
            let permit = Arc::clone(&semaphore);
            let record = record.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow!("Semaphore acquisition failed"))?;

                let html = fetcher.fetch_text(&record.url).await?;
                let facts = parser.parse(&html, &record.url);
                debug!("Scraped macros for {}", record.name);

                Ok::<EnrichedFood, anyhow::Error>(EnrichedFood { record, facts })
            }));
        }

        let mut enriched = Vec::new();
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(Ok(food)) => enriched.push(food),
                Ok(Err(e)) => warn!("Error fetching nutrition: {:#}", e),
                Err(e) => warn!("Nutrition task failed: {}", e),
            }
        }

        info!("Fetched nutrition for {} foods", enriched.len());
        enriched
    }
}
