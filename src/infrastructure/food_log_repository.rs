//! Food log rows: what a registered user or a guest ate, per date and meal.
//!
//! Only the writes and the daily roll-up the catalog's integrity rules touch
//! live here. Owner columns are filled from [`LogOwner::columns`], so a row
//! always has exactly one of `user_id` and `visitor_id`.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::domain::food::MacroTotals;
use crate::domain::food_log::LogOwner;
use crate::domain::menu::{MealType, MenuDate};

pub struct FoodLogRepository {
    pool: SqlitePool,
}

impl FoodLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns false when the food is not in the catalog
    pub async fn log_food(
        &self,
        owner: LogOwner,
        food_id: i64,
        servings: f64,
        date: MenuDate,
        meal: MealType,
    ) -> Result<bool> {
        let (user_id, visitor_id) = owner.columns();

        let result = sqlx::query(
            r#"
            INSERT INTO food_logs (user_id, visitor_id, food_id, date, meal_type, servings)
            SELECT ?, ?, id, ?, ?, ? FROM foods WHERE id = ?
            "#,
        )
        .bind(user_id)
        .bind(visitor_id)
        .bind(date.to_string())
        .bind(meal)
        .bind(servings)
        .bind(food_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Macros times servings, summed over the owner's logs for a date
    pub async fn daily_totals(&self, owner: LogOwner, date: MenuDate) -> Result<MacroTotals> {
        let (user_id, visitor_id) = owner.columns();

        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(f.calories * l.servings), 0.0) AS calories,
                COALESCE(SUM(f.protein * l.servings), 0.0) AS protein,
                COALESCE(SUM(f.carbs * l.servings), 0.0) AS carbs,
                COALESCE(SUM(f.fat * l.servings), 0.0) AS fat
            FROM food_logs l
            JOIN foods f ON f.id = l.food_id
            WHERE l.user_id IS ? AND l.visitor_id IS ? AND l.date = ?
            "#,
        )
        .bind(user_id)
        .bind(visitor_id)
        .bind(date.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(MacroTotals {
            calories: round1(row.try_get("calories")?),
            protein: round1(row.try_get("protein")?),
            carbs: round1(row.try_get("carbs")?),
            fat: round1(row.try_get("fat")?),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
