//! Command line interface
//!
//! Each subcommand loads configuration, opens the database and calls into
//! the application layer. Results go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::application::{MenuService, ScrapeOrchestrator, StationMenu};
use crate::domain::menu::{MealType, MenuDate};
use crate::domain::repositories::ScrapeRunRepository;
use crate::infrastructure::{
    AppConfig, ConfigManager, DatabaseConnection, HttpClient, HttpClientConfig, LoadedConfig,
    SqliteFoodCatalog, SqliteScrapeRunRepository, init_logging_with_config,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Configuration file; defaults to the per-user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database schema.
    InitDb,
    /// Scrape every configured dining hall once.
    Scrape(ScrapeArgs),
    /// Show one meal's menu grouped by station.
    Menu(MenuArgs),
    /// Show one catalog entry.
    Food(FoodArgs),
    /// Show recent scrape runs.
    Runs(RunsArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Menu date (M/D/YYYY or YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<MenuDate>,
}

#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Dining hall name as configured.
    #[arg(long)]
    pub hall: String,

    /// breakfast, lunch, dinner or brunch.
    #[arg(long)]
    pub meal: MealType,

    /// Menu date (M/D/YYYY or YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<MenuDate>,
}

#[derive(Debug, Args)]
pub struct FoodArgs {
    /// Catalog id.
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct RunsArgs {
    /// Number of runs to show.
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

/// Loaded configuration plus an open, migrated database
struct AppContext {
    config: AppConfig,
    database: DatabaseConnection,
}

impl AppContext {
    async fn open(config_path: Option<PathBuf>) -> Result<Self> {
        let manager = match config_path {
            Some(path) => ConfigManager::with_path(path),
            None => ConfigManager::new()?,
        };
        let LoadedConfig { config, created } = manager.load_config().await.context("load config")?;

        init_logging_with_config(&config.logging).context("init logging")?;
        if created {
            info!("Configuration file not found, created default: {:?}", manager.path());
        } else {
            info!("Loaded configuration from: {:?}", manager.path());
        }

        let database = DatabaseConnection::new(&config.database.url)
            .await
            .context("open database")?;
        database.migrate().await.context("migrate database")?;

        Ok(Self { config, database })
    }

    fn catalog(&self) -> Arc<SqliteFoodCatalog> {
        Arc::new(SqliteFoodCatalog::new(self.database.pool().clone()))
    }

    fn runs(&self) -> Arc<SqliteScrapeRunRepository> {
        Arc::new(SqliteScrapeRunRepository::new(self.database.pool().clone()))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let context = AppContext::open(cli.config).await?;

    match cli.command {
        Command::InitDb => {
            println!("Database ready: {}", context.config.database.url);
        }
        Command::Scrape(args) => scrape(&context, args).await.context("scrape")?,
        Command::Menu(args) => menu(&context, args).await.context("menu")?,
        Command::Food(args) => food(&context, args).await.context("food")?,
        Command::Runs(args) => runs(&context, args).await.context("runs")?,
    }

    Ok(())
}

async fn scrape(context: &AppContext, args: ScrapeArgs) -> Result<()> {
    let scraper = &context.config.scraper;
    let fetcher = Arc::new(HttpClient::new(HttpClientConfig::from(scraper))?);

    let orchestrator = ScrapeOrchestrator::new(scraper.clone(), fetcher, context.catalog(), context.runs())?;
    let summary = orchestrator.run_scrape(args.date).await;

    info!("Scrape finished with status {}", summary.status);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn menu(context: &AppContext, args: MenuArgs) -> Result<()> {
    if context.config.scraper.dining_hall(&args.hall).is_none() {
        anyhow::bail!("{} is not a valid dining hall.", args.hall);
    }

    let date = args.date.unwrap_or_else(MenuDate::today);
    let service = MenuService::new(context.catalog());
    let menu = service.lookup_foods_for_meal(args.meal, date, &args.hall).await?;

    if menu.is_empty() {
        println!("No {} menu for {} on {}", args.meal, args.hall, date);
        return Ok(());
    }

    println!("{} {} on {}", args.hall, args.meal, date);
    print_station_menu(&menu);
    Ok(())
}

fn print_station_menu(menu: &StationMenu) {
    for (station, foods) in menu {
        println!("\n{station}");
        for food in foods {
            println!(
                "  [{:>5}] {:<40} {:>6.1} kcal  P {:>5.1}g  C {:>5.1}g  F {:>5.1}g  ({})",
                food.id, food.name, food.calories, food.protein, food.carbs, food.fat, food.serving_size
            );
        }
    }
}

async fn food(context: &AppContext, args: FoodArgs) -> Result<()> {
    let service = MenuService::new(context.catalog());
    match service.lookup_food_by_id(args.id).await? {
        Some(food) => println!("{}", serde_json::to_string_pretty(&food)?),
        None => anyhow::bail!("No food with id {}", args.id),
    }
    Ok(())
}

async fn runs(context: &AppContext, args: RunsArgs) -> Result<()> {
    let runs = context.runs().recent(args.limit).await?;
    if runs.is_empty() {
        println!("No scrape runs recorded");
        return Ok(());
    }

    for run in runs {
        println!(
            "{:>4}  {:<10}  {:<7}  ran {}  found {:>4}  new {:>4}  menu rows {:>4}",
            run.id.unwrap_or_default(),
            run.menu_date.to_string(),
            run.status.as_str(),
            run.ran_at.format("%Y-%m-%d %H:%M:%S"),
            run.foods_found,
            run.new_foods,
            run.menu_rows
        );
    }
    Ok(())
}
