//! Repository for scrape run audit records
//!
//! Append-only: rows are inserted once per invocation and never updated.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use sqlx::{Row, SqlitePool};

use crate::domain::menu::MenuDate;
use crate::domain::repositories::ScrapeRunRepository;
use crate::domain::scrape_run::{ScrapeRun, ScrapeStatus};

/// SQLite implementation of ScrapeRunRepository
pub struct SqliteScrapeRunRepository {
    pool: SqlitePool,
}

impl SqliteScrapeRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Helper method to convert database row to ScrapeRun
    fn row_to_run(row: &sqlx::sqlite::SqliteRow) -> Result<ScrapeRun> {
        let ran_at: String = row.try_get("ran_at")?;
        let ran_at = DateTime::parse_from_rfc3339(&ran_at)
            .map_err(|e| anyhow!("Failed to parse ran_at: {}", e))?
            .with_timezone(&Local);

        let menu_date: String = row.try_get("menu_date")?;
        let menu_date: MenuDate = menu_date.parse().map_err(|e: String| anyhow!(e))?;

        let status: ScrapeStatus = row.try_get("status")?;

        Ok(ScrapeRun {
            id: Some(row.try_get("id")?),
            menu_date,
            ran_at,
            status,
            foods_found: counter(row, "foods_found")?,
            new_foods: counter(row, "new_foods")?,
            menu_rows: counter(row, "menu_rows")?,
        })
    }
}

fn counter(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<u64> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value).map_err(|_| anyhow!("Negative {} in scrape run: {}", column, value))
}

fn to_column(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("Counter out of range: {}", value))
}

#[async_trait]
impl ScrapeRunRepository for SqliteScrapeRunRepository {
    async fn record(&self, run: &ScrapeRun) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO scrape_runs (menu_date, ran_at, status, foods_found, new_foods, menu_rows)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(run.menu_date.to_string())
        .bind(run.ran_at.to_rfc3339())
        .bind(run.status)
        .bind(to_column(run.foods_found)?)
        .bind(to_column(run.new_foods)?)
        .bind(to_column(run.menu_rows)?)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ScrapeRun>> {
        let rows = sqlx::query("SELECT * FROM scrape_runs ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_run).collect()
    }

    async fn last_for_date(&self, date: MenuDate) -> Result<Option<ScrapeRun>> {
        let row = sqlx::query("SELECT * FROM scrape_runs WHERE menu_date = ? ORDER BY id DESC LIMIT 1")
            .bind(date.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_run).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scrape_run::ScrapeCounters;
    use crate::test_utils::TestDatabase;
    use chrono::NaiveDate;

    fn date(day: u32) -> MenuDate {
        MenuDate::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap())
    }

    #[tokio::test]
    async fn test_record_and_read_back() -> Result<()> {
        let db = TestDatabase::new().await?;
        let repo = SqliteScrapeRunRepository::new(db.pool());

        let counters = ScrapeCounters { foods_found: 12, new_foods: 3, menu_rows: 12 };
        let run = ScrapeRun::new(date(4), Local::now(), ScrapeStatus::Success, counters);
        let id = repo.record(&run).await?;

        let stored = repo.last_for_date(date(4)).await?.unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.status, ScrapeStatus::Success);
        assert_eq!(stored.foods_found, 12);
        assert_eq!(stored.new_foods, 3);
        assert_eq!(stored.menu_rows, 12);
        assert_eq!(stored.ran_at.timestamp(), run.ran_at.timestamp());

        assert!(repo.last_for_date(date(5)).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() -> Result<()> {
        let db = TestDatabase::new().await?;
        let repo = SqliteScrapeRunRepository::new(db.pool());

        for (day, status) in [(1, ScrapeStatus::Closed), (2, ScrapeStatus::Failed), (3, ScrapeStatus::Success)] {
            repo.record(&ScrapeRun::new(date(day), Local::now(), status, ScrapeCounters::default()))
                .await?;
        }

        let runs = repo.recent(2).await?;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].menu_date, date(3));
        assert_eq!(runs[1].status, ScrapeStatus::Failed);
        Ok(())
    }
}
