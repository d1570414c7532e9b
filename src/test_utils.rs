//! Test utilities
//!
//! Isolated in-memory databases and small fixture builders shared by the
//! unit tests.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::food::NutritionFacts;
use crate::domain::menu::{MealType, MenuDate, MenuRecord};
use crate::infrastructure::DatabaseConnection;

/// Test database configuration
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Fresh, migrated in-memory database
    pub async fn new() -> Result<Self> {
        let db = DatabaseConnection::in_memory().await?;
        db.migrate().await?;
        Ok(Self { connection: db })
    }

    /// Get the database pool for use in repositories
    pub fn pool(&self) -> sqlx::Pool<sqlx::Sqlite> {
        self.connection.pool().clone()
    }
}

pub fn sample_date() -> MenuDate {
    MenuDate::new(NaiveDate::from_ymd_opt(2025, 12, 23).unwrap_or_default())
}

/// A South Campus record on [`sample_date`]
pub fn sample_record(url: &str, name: &str, meal: MealType, station: &str) -> MenuRecord {
    MenuRecord {
        name: name.to_string(),
        url: url.to_string(),
        meal,
        dining_hall: "South Campus".to_string(),
        station: station.to_string(),
        date: sample_date(),
        allergens: Vec::new(),
    }
}

pub fn sample_facts(url: &str, name: &str, protein: f64) -> NutritionFacts {
    NutritionFacts {
        name: name.to_string(),
        url: url.to_string(),
        serving_size: Some("1 each".to_string()),
        protein,
        carbs: 10.0,
        fat: 2.0,
        calories: 100.0,
    }
}
