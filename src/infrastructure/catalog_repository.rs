//! SQLite implementation of the food catalog
//!
//! Writes are batched, one transaction per batch, and use `INSERT OR IGNORE`
//! so that a repeated or overlapping scrape never duplicates a row or
//! overwrites nutrition already on file.

#![allow(clippy::uninlined_format_args)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::{debug, warn};

use crate::domain::food::{Food, FoodSummary, MenuFoodRow, NutritionFacts};
use crate::domain::menu::{MealType, MenuDate, MenuRecord};
use crate::domain::repositories::FoodCatalog;

#[derive(Clone)]
pub struct SqliteFoodCatalog {
    pool: Arc<SqlitePool>,
}

impl SqliteFoodCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    fn row_to_food(row: &SqliteRow) -> Food {
        Food {
            id: row.get("id"),
            name: row.get("name"),
            url: row.get("url"),
            serving_size: row.get("serving_size"),
            protein: row.get("protein"),
            carbs: row.get("carbs"),
            fat: row.get("fat"),
            calories: row.get("calories"),
        }
    }
}

#[async_trait]
impl FoodCatalog for SqliteFoodCatalog {
    async fn existing_urls(&self) -> Result<HashSet<String>> {
        let urls: Vec<String> = sqlx::query_scalar("SELECT url FROM foods")
            .fetch_all(&*self.pool)
            .await
            .context("Failed to load catalog URLs")?;
        Ok(urls.into_iter().collect())
    }

    async fn insert_foods(&self, foods: &[NutritionFacts]) -> Result<u64> {
        if foods.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for food in foods {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO foods (name, url, protein, carbs, fat, calories, serving_size)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&food.name)
            .bind(&food.url)
            .bind(food.protein)
            .bind(food.carbs)
            .bind(food.fat)
            .bind(food.calories)
            .bind(food.serving_size.as_deref().unwrap_or(""))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert food {}", food.url))?;

            if result.rows_affected() == 0 {
                debug!("Food already in catalog, keeping existing row: {}", food.url);
            }
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_menu_entries(&self, records: &[MenuRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        // Ids are assigned by the catalog, so resolve them after foods were written
        let url_to_id: HashMap<String, i64> = sqlx::query("SELECT id, url FROM foods")
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(|row| (row.get::<String, _>("url"), row.get::<i64, _>("id")))
            .collect();

        let mut inserted = 0;
        for record in records {
            let Some(food_id) = url_to_id.get(&record.url) else {
                warn!("No catalog entry for {}, dropping menu row", record.url);
                continue;
            };

            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO menus (food_id, location, station, date, meal_type)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(food_id)
            .bind(&record.dining_hall)
            .bind(&record.station)
            .bind(record.date.to_string())
            .bind(record.meal)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert menu row for {}", record.url))?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn foods_for_meal(
        &self,
        meal: MealType,
        date: MenuDate,
        location: &str,
    ) -> Result<Vec<MenuFoodRow>> {
        let rows = sqlx::query(
            r#"
            SELECT m.station, f.id, f.name, f.serving_size, f.protein, f.carbs, f.fat, f.calories
            FROM menus m
            JOIN foods f ON f.id = m.food_id
            WHERE m.meal_type = ? AND m.date = ? AND m.location = ?
            ORDER BY m.station, f.name
            "#,
        )
        .bind(meal)
        .bind(date.to_string())
        .bind(location)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| MenuFoodRow {
                station: row.get("station"),
                food: FoodSummary {
                    id: row.get("id"),
                    name: row.get("name"),
                    serving_size: row.get("serving_size"),
                    protein: row.get("protein"),
                    carbs: row.get("carbs"),
                    fat: row.get("fat"),
                    calories: row.get("calories"),
                },
            })
            .collect())
    }

    async fn food_by_id(&self, id: i64) -> Result<Option<Food>> {
        let row = sqlx::query(
            "SELECT id, name, url, serving_size, protein, carbs, fat, calories FROM foods WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.as_ref().map(Self::row_to_food))
    }

    async fn has_brunch(&self, date: MenuDate) -> Result<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM menus WHERE date = ? AND meal_type = ? LIMIT 1")
                .bind(date.to_string())
                .bind(MealType::Brunch)
                .fetch_optional(&*self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn has_menu_for_date(&self, date: MenuDate) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM menus WHERE date = ? LIMIT 1")
            .bind(date.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn delete_food(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_menu_entries(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }
}
