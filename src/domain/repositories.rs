//! Repository interfaces for the food catalog and the scrape audit log
//!
//! The catalog is the only shared mutable resource of the pipeline. Every write
//! is insert-or-ignore, so repeated or overlapping runs cannot duplicate rows.

use async_trait::async_trait;
use anyhow::Result;
use std::collections::HashSet;

use crate::domain::food::{Food, MenuFoodRow, NutritionFacts};
use crate::domain::menu::{MealType, MenuDate, MenuRecord};
use crate::domain::scrape_run::ScrapeRun;

#[async_trait]
pub trait FoodCatalog: Send + Sync {
    /// Natural keys (detail-page URLs) of every food in the catalog
    async fn existing_urls(&self) -> Result<HashSet<String>>;

    /// Insert foods, ignoring URLs that already exist. Returns rows inserted.
    async fn insert_foods(&self, foods: &[NutritionFacts]) -> Result<u64>;

    /// Insert menu rows for records whose URL resolves to a catalog id,
    /// ignoring rows already present. Returns rows inserted.
    async fn insert_menu_entries(&self, records: &[MenuRecord]) -> Result<u64>;

    /// Foods on a meal's menu at one dining hall, ordered by station then name
    async fn foods_for_meal(
        &self,
        meal: MealType,
        date: MenuDate,
        location: &str,
    ) -> Result<Vec<MenuFoodRow>>;

    async fn food_by_id(&self, id: i64) -> Result<Option<Food>>;

    /// Whether any dining hall served brunch on the date
    async fn has_brunch(&self, date: MenuDate) -> Result<bool>;

    async fn has_menu_for_date(&self, date: MenuDate) -> Result<bool>;

    /// Remove a food together with its menu and log rows
    async fn delete_food(&self, id: i64) -> Result<bool>;

    async fn count_menu_entries(&self) -> Result<i64>;
}

#[async_trait]
pub trait ScrapeRunRepository: Send + Sync {
    /// Append an audit record, returning its id
    async fn record(&self, run: &ScrapeRun) -> Result<i64>;

    /// Most recent runs first
    async fn recent(&self, limit: u32) -> Result<Vec<ScrapeRun>>;

    async fn last_for_date(&self, date: MenuDate) -> Result<Option<ScrapeRun>>;
}
