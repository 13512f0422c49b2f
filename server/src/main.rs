mod config;
mod http;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{self, DatabaseSettings, DbPool};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::clock::{Clock, SystemClock};
use products_hr::database::DbEmployeeStore;
use products_hr::memory::MemoryEmployeeStore;
use products_hr::repository::EmployeeStore;
use products_hr::seed;
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::http::{AppState, ServeConfig};

#[derive(Parser, Debug)]
#[command(name = "employee-api", version, about = "Employee benefits CRUD API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Apply the idempotent seed data against the database backend.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed => run_seed(app_config).await,
    }
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env();
    platform_db::connect(&settings).await.map_err(Into::into)
}

async fn build_store(config: &AppConfig, allow_dirty: bool) -> Result<Arc<dyn EmployeeStore>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Ok(match config.storage {
        StorageBackend::Memory => {
            Arc::new(MemoryEmployeeStore::new(clock, config.audit_actor.clone()))
        }
        StorageBackend::Database => {
            let pool = setup_pool().await?;
            ensure_migrations(&pool, allow_dirty).await?;
            Arc::new(DbEmployeeStore::new(pool, clock, config.audit_actor.clone()))
        }
    })
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let store = build_store(&config, cmd.allow_dirty).await?;
    seed::seed(store.as_ref()).await?;
    info!(backend = config.storage.as_str(), "employee store ready");
    let state = AppState {
        store,
        config: config.clone(),
    };
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}

async fn run_seed(config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool().await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = DbEmployeeStore::new(pool, clock, config.audit_actor.clone());
    seed::seed(&store).await?;
    info!("seed data applied");
    Ok(())
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
