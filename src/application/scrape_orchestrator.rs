//! Run orchestrator: one scrape of every configured dining hall for one date.
//!
//! Halls are processed one after another. A hall without a menu container
//! is closed and skipped. Any other error ends the run as failed with all
//! counters zeroed. Exactly one audit record is written per call, and
//! [`ScrapeOrchestrator::run_scrape`] never returns an error.

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info, warn};

use super::catalog_reconciler::CatalogReconciler;
use super::nutrition_fetcher::NutritionFetcher;
use crate::domain::menu::{MenuDate, MenuRecord};
use crate::domain::repositories::{FoodCatalog, ScrapeRunRepository};
use crate::domain::scrape_run::{ScrapeCounters, ScrapeRun, ScrapeStatus, ScrapeSummary};
use crate::infrastructure::config::{DiningHall, ScraperConfig};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{MenuParser, NutritionParser};
use crate::infrastructure::parsing_error::{FetchError, ParsingError};

/// Errors that end a run as failed
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParsingError),

    #[error("Database error: {0:#}")]
    Persistence(anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub struct ScrapeOrchestrator {
    config: ScraperConfig,
    fetcher: Arc<dyn PageFetcher>,
    menu_parser: MenuParser,
    reconciler: CatalogReconciler,
    runs: Arc<dyn ScrapeRunRepository>,
}

impl ScrapeOrchestrator {
    pub fn new(
        config: ScraperConfig,
        fetcher: Arc<dyn PageFetcher>,
        catalog: Arc<dyn FoodCatalog>,
        runs: Arc<dyn ScrapeRunRepository>,
    ) -> Result<Self, ScrapeError> {
        let menu_parser = MenuParser::new(&config.base_url)?;
        let nutrition = NutritionFetcher::new(
            Arc::clone(&fetcher),
            NutritionParser::new()?,
            config.max_concurrent_fetches,
        );

        Ok(Self {
            reconciler: CatalogReconciler::new(catalog, nutrition),
            config,
            fetcher,
            menu_parser,
            runs,
        })
    }

    /// Scrape every configured hall for `date` (today when `None`)
    pub async fn run_scrape(&self, date: Option<MenuDate>) -> ScrapeSummary {
        let ran_at = Local::now();
        let menu_date = date.unwrap_or_else(MenuDate::today);

        info!("Starting scrape for {}", menu_date);

        let (status, counters, error) = match self.scrape_all_halls(menu_date).await {
            Ok(counters) if counters.foods_found == 0 => (ScrapeStatus::Closed, counters, None),
            Ok(counters) => (ScrapeStatus::Success, counters, None),
            Err(e) => {
                error!("Scraper failed: {}", e);
                (ScrapeStatus::Failed, ScrapeCounters::default(), Some(e.to_string()))
            }
        };

        let run = ScrapeRun::new(menu_date, ran_at, status, counters);
        if let Err(e) = self.runs.record(&run).await {
            error!("Failed to record scrape run for {}: {:#}", menu_date, e);
        }

        match status {
            ScrapeStatus::Closed => info!("Dining halls were closed on {}", menu_date),
            ScrapeStatus::Success => info!(
                "Scraped {} foods, added {} new foods, {} menu rows",
                counters.foods_found, counters.new_foods, counters.menu_rows
            ),
            ScrapeStatus::Failed => {}
        }

        ScrapeSummary {
            status,
            menu_date,
            foods_found: counters.foods_found,
            new_foods: counters.new_foods,
            menu_rows: counters.menu_rows,
            error,
        }
    }

    async fn scrape_all_halls(&self, date: MenuDate) -> Result<ScrapeCounters, ScrapeError> {
        let mut totals = ScrapeCounters::default();

        for hall in &self.config.dining_halls {
            let Some(records) = self.scrape_menu(hall, date).await? else {
                continue;
            };

            let outcome = self
                .reconciler
                .reconcile_hall(&records)
                .await
                .map_err(ScrapeError::Persistence)?;

            totals.add(ScrapeCounters {
                foods_found: records.len() as u64,
                new_foods: outcome.new_foods,
                menu_rows: outcome.menu_rows,
            });
        }

        Ok(totals)
    }

    /// Menu records for one hall, or `None` when the hall has no menu
    async fn scrape_menu(&self, hall: &DiningHall, date: MenuDate) -> Result<Option<Vec<MenuRecord>>, ScrapeError> {
        let url = self
            .config
            .menu_url(&hall.name, &date.to_string())
            .map_err(|e| ScrapeError::Config(e.to_string()))?;

        let html = self.fetcher.fetch_text(&url).await?;

        match self.menu_parser.parse(&html, &hall.name, date) {
            Ok(records) => {
                info!("Scraping {} menu on {}: {} items", hall.name, date, records.len());
                Ok(Some(records))
            }
            Err(e) if e.is_recoverable() => {
                warn!("Invalid menu for {} on {}", hall.name, date);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
