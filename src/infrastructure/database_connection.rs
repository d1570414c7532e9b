// Database connection and pool management
// This module handles SQLite database connections using sqlx

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS foods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        url TEXT NOT NULL UNIQUE,
        protein REAL NOT NULL DEFAULT 0.0,
        carbs REAL NOT NULL DEFAULT 0.0,
        fat REAL NOT NULL DEFAULT 0.0,
        calories REAL NOT NULL DEFAULT 0.0,
        serving_size TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS menus (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        food_id INTEGER NOT NULL,
        location TEXT NOT NULL,
        station TEXT NOT NULL,
        date TEXT NOT NULL,
        meal_type TEXT NOT NULL,
        UNIQUE (food_id, location, date, meal_type),
        FOREIGN KEY (food_id) REFERENCES foods (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scrape_runs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        menu_date TEXT NOT NULL,
        ran_at DATETIME NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('success', 'closed', 'failed')),
        foods_found INTEGER NOT NULL DEFAULT 0,
        new_foods INTEGER NOT NULL DEFAULT 0,
        menu_rows INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS food_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        visitor_id TEXT,
        food_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        meal_type TEXT NOT NULL,
        servings REAL NOT NULL DEFAULT 1.0,
        CHECK ((user_id IS NULL) <> (visitor_id IS NULL)),
        FOREIGN KEY (food_id) REFERENCES foods (id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_menus_date_location_meal ON menus (date, location, meal_type)",
    "CREATE INDEX IF NOT EXISTS idx_scrape_runs_menu_date ON scrape_runs (menu_date)",
    "CREATE INDEX IF NOT EXISTS idx_food_logs_date ON food_logs (date)",
];

impl DatabaseConnection {
    /// Open (creating if needed) a file-backed database
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {database_url}"))?;

        info!("Connected to database: {}", database_url);
        Ok(Self { pool })
    }

    /// One shared in-memory database; every pooled connection would otherwise
    /// get its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply schema")?;
        }
        Ok(())
    }
}
