//! Infrastructure layer for configuration, storage, fetching and parsing
//!
//! This module provides the SQLite connection and repositories, the rate-limited
//! page fetcher, the menu and nutrition label parsers, configuration and logging.

pub mod catalog_repository;
pub mod config;
pub mod database_connection;
pub mod food_log_repository;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod scrape_run_repository;

// Re-export commonly used items
pub use catalog_repository::SqliteFoodCatalog;
pub use config::{
    AppConfig, ConfigManager, DatabaseConfig, DiningHall, LoadedConfig, LoggingConfig, ScraperConfig,
};
pub use database_connection::DatabaseConnection;
pub use food_log_repository::FoodLogRepository;
pub use http_client::{HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{MenuParser, NutritionParser};
pub use parsing_error::{FetchError, ParsingError, ParsingResult};
pub use scrape_run_repository::SqliteScrapeRunRepository;
