//! Domain module - Core entities and value objects
//!
//! Foods, menus, scrape runs and log ownership, plus the repository
//! interfaces the application layer is written against.

pub mod food;
pub mod food_log;
pub mod menu;
pub mod repositories;
pub mod scrape_run;

// Re-export commonly used items for convenience
pub use food::{Food, FoodSummary, MacroTotals, MenuFoodRow, NutritionFacts};
pub use food_log::LogOwner;
pub use menu::{MealType, MenuDate, MenuLayout, MenuRecord};
pub use repositories::{FoodCatalog, ScrapeRunRepository};
pub use scrape_run::{ScrapeCounters, ScrapeRun, ScrapeStatus, ScrapeSummary};
