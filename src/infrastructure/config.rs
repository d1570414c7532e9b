//! Configuration infrastructure
//!
//! Contains configuration loading and management for the nutrition portal scraper.
//!
//! Nothing here is global: an [`AppConfig`] is loaded once and handed to the
//! HTTP client and the scrape orchestrator at construction time, so tests can
//! point them at a fake source.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use tokio::fs;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// A dining hall and the portal's location number for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningHall {
    pub name: String,
    pub location_num: u32,
}

impl DiningHall {
    pub fn new(name: &str, location_num: u32) -> Self {
        Self {
            name: name.to_string(),
            location_num,
        }
    }
}

/// Source site and fetch behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site base; relative item links are appended to it
    pub base_url: String,

    /// Dining halls in the order a run visits them
    pub dining_halls: Vec<DiningHall>,

    /// Upper bound on in-flight nutrition page fetches
    pub max_concurrent_fetches: usize,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Client-side politeness limit
    pub max_requests_per_second: u32,

    pub user_agent: String,
}

/// Database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for daily-rotated log files; defaults next to the executable
    pub log_dir: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: umd::BASE_URL.to_string(),
            dining_halls: umd::DINING_HALLS
                .iter()
                .map(|(name, num)| DiningHall::new(name, *num))
                .collect(),
            max_concurrent_fetches: defaults::MAX_CONCURRENT_FETCHES,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
        }
    }
}

impl ScraperConfig {
    pub fn dining_hall(&self, name: &str) -> Option<&DiningHall> {
        self.dining_halls.iter().find(|hall| hall.name == name)
    }

    /// Menu page URL for a configured dining hall on a date (`M/D/YYYY`)
    pub fn menu_url(&self, hall_name: &str, date: &str) -> Result<String> {
        let hall = self
            .dining_hall(hall_name)
            .ok_or_else(|| anyhow!("{hall_name} is not a valid dining hall."))?;
        Ok(utils::menu_url(&self.base_url, hall.location_num, date))
    }
}

/// A loaded configuration and whether it was freshly written
///
/// Loading runs before logging is installed, so the caller reports where the
/// configuration came from once a subscriber exists.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub created: bool,
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("dining-menu-sync");

        Ok(config_dir)
    }

    /// Configuration manager for the default per-user location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("config.json");
        Ok(Self { config_path })
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<LoadedConfig> {
        if !self.config_path.exists() {
            let config = AppConfig::default();
            self.save_config(&config).await?;
            return Ok(LoadedConfig { config, created: true });
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {:?}", self.config_path))?;

        validate(&config)?;
        Ok(LoadedConfig {
            config,
            created: false,
        })
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.scraper.max_concurrent_fetches == 0 {
        return Err(anyhow!("scraper.max_concurrent_fetches must be greater than 0"));
    }
    if config.scraper.max_requests_per_second == 0 {
        return Err(anyhow!("scraper.max_requests_per_second must be greater than 0"));
    }
    if config.scraper.dining_halls.is_empty() {
        return Err(anyhow!("scraper.dining_halls must list at least one dining hall"));
    }
    Ok(())
}

/// University of Maryland nutrition portal
pub mod umd {
    pub const BASE_URL: &str = "https://nutrition.umd.edu/";

    /// Dining hall name and `locationNum` query value
    pub const DINING_HALLS: &[(&str, u32)] = &[
        ("South Campus", 16),
        ("Yahentamitsi Dining Hall", 19),
        ("251 North", 51),
    ];
}

/// Default configuration values
pub mod defaults {
    /// Default maximum concurrent nutrition page fetches
    pub const MAX_CONCURRENT_FETCHES: usize = 10;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default client-side request rate
    pub const MAX_REQUESTS_PER_SECOND: u32 = 10;

    pub const USER_AGENT: &str = "dining-menu-sync/0.1 (+macro tracker)";

    pub const DATABASE_URL: &str = "sqlite:macro_tracker.db";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;
}

/// URL building helper functions
pub mod utils {
    /// `{base}?locationNum={n}&dtdate={date}`
    pub fn menu_url(base_url: &str, location_num: u32, date: &str) -> String {
        format!("{base_url}?locationNum={location_num}&dtdate={date}")
    }

    /// Append a relative link to the site base without doubling the slash
    pub fn resolve_url(base_url: &str, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if base_url.ends_with('/') {
            format!("{}{}", base_url, href.trim_start_matches('/'))
        } else if href.starts_with('/') {
            format!("{base_url}{href}")
        } else {
            format!("{base_url}/{href}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_menu_url_for_configured_hall() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.menu_url("South Campus", "5/19/2025").unwrap(),
            "https://nutrition.umd.edu/?locationNum=16&dtdate=5/19/2025"
        );
        assert!(config.menu_url("Nowhere Hall", "5/19/2025").is_err());
    }

    #[test]
    fn test_url_resolution() {
        assert_eq!(
            utils::resolve_url("https://nutrition.umd.edu/", "label.aspx?RecNumAndPort=1"),
            "https://nutrition.umd.edu/label.aspx?RecNumAndPort=1"
        );
        assert_eq!(
            utils::resolve_url("https://nutrition.umd.edu/", "/label.aspx"),
            "https://nutrition.umd.edu/label.aspx"
        );
        assert_eq!(
            utils::resolve_url("http://127.0.0.1:8080", "label.aspx"),
            "http://127.0.0.1:8080/label.aspx"
        );
        assert_eq!(
            utils::resolve_url("https://nutrition.umd.edu/", "https://other.org/x"),
            "https://other.org/x"
        );
    }

    #[tokio::test]
    async fn test_missing_config_file_is_created_with_defaults() -> Result<()> {
        let dir = tempdir()?;
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let loaded = manager.load_config().await?;
        assert!(loaded.created);
        assert!(manager.path().exists());
        assert_eq!(loaded.config.scraper.dining_halls.len(), 3);
        assert_eq!(loaded.config.scraper.max_concurrent_fetches, 10);

        let reloaded = manager.load_config().await?;
        assert!(!reloaded.created);
        assert_eq!(reloaded.config.scraper.base_url, loaded.config.scraper.base_url);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_config_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json")?;

        let manager = ConfigManager::with_path(&path);
        assert!(manager.load_config().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let manager = ConfigManager::with_path(dir.path().join("config.json"));
        let mut config = AppConfig::default();
        config.scraper.max_concurrent_fetches = 0;
        manager.save_config(&config).await?;

        assert!(manager.load_config().await.is_err());
        Ok(())
    }
}
