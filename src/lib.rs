//! Dining Menu Sync - daily dining-hall menu and nutrition ingestion
//!
//! Scrapes each configured dining hall's menu page, fetches nutrition labels
//! for foods not yet in the catalog, and reconciles both into SQLite for
//! macro logging.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

pub use application::{MenuService, ScrapeOrchestrator};
pub use commands::{Cli, run};
