//! Application layer module
//!
//! The scrape pipeline (reconcile, enrich, orchestrate) and the read-side
//! menu queries, written against the domain repository traits.

pub mod catalog_reconciler;
pub mod menu_service;
pub mod nutrition_fetcher;
pub mod scrape_orchestrator;

pub use catalog_reconciler::{CatalogReconciler, HallOutcome, partition_new};
pub use menu_service::{MenuService, StationMenu};
pub use nutrition_fetcher::{EnrichedFood, NutritionFetcher};
pub use scrape_orchestrator::{ScrapeError, ScrapeOrchestrator};
