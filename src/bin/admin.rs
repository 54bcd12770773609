//! CLI administration tool for lexicon-api.
//!
//! Provides commands for viewing statistics, importing definitions and
//! performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Import definitions from a JSON file (object or array)
//! cargo run --bin admin -- import definitions.json
//!
//! # Delete every definition
//! cargo run --bin admin -- purge --yes
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or its components) is required, and
//! `STRICT_KEY_COUNT` / `DEFINITION_OPTIONAL_FIELDS` shape import validation.

use lexicon_api::application::services::{Created, DefinitionService};
use lexicon_api::config;
use lexicon_api::infrastructure::persistence::PgDefinitionRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use serde_json::Value;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing lexicon-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Import definitions from a JSON file
    Import {
        /// Path to a JSON object or array of definitions
        file: PathBuf,
    },

    /// Delete all definitions
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Import { file } => {
            let service = DefinitionService::new(
                Arc::new(PgDefinitionRepository::new(Arc::new(pool.clone()))),
                config.create_rules(),
            );
            import(&service, file).await?;
        }
        Commands::Purge { yes } => purge(&pool, yes).await?,
    }

    Ok(())
}

/// Displays collection statistics.
///
/// Shows:
/// - Total number of definitions
/// - Count per rarity
/// - The ten largest categories
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM definitions")
        .fetch_one(pool)
        .await?;

    println!(
        "  Definitions: {}",
        total.to_string().bright_green().bold()
    );
    println!();

    let by_rarity: Vec<(String, i64)> = sqlx::query_as(
        "SELECT rarity, COUNT(*) FROM definitions GROUP BY rarity ORDER BY rarity",
    )
    .fetch_all(pool)
    .await?;

    println!("  {}", "By rarity".bright_white().bold());
    for (rarity, count) in &by_rarity {
        println!("    {:<12} {}", rarity.cyan(), count.to_string().bright_green());
    }
    println!();

    let by_category: Vec<(String, i64)> = sqlx::query_as(
        "SELECT category, COUNT(*) AS n FROM definitions \
         GROUP BY category ORDER BY n DESC, category LIMIT 10",
    )
    .fetch_all(pool)
    .await?;

    println!("  {}", "Top categories".bright_white().bold());
    if by_category.is_empty() {
        println!("    {}", "none".bright_black());
    }
    for (category, count) in &by_category {
        println!("    {:<24} {}", category.cyan(), count.to_string().bright_green());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}

/// Validates and inserts the definitions in `file`.
///
/// Uses the same rules as `POST /definitions`; a batch is stored atomically.
async fn import(service: &DefinitionService, file: PathBuf) -> Result<()> {
    println!(
        "{} {}",
        "📥 Importing".bright_blue().bold(),
        file.display().to_string().cyan()
    );
    println!();

    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let body: Value = serde_json::from_str(&raw).context("File is not valid JSON")?;

    let created = match service.create(body).await {
        Ok(created) => created,
        Err(e) => {
            let info = e.to_error_info();
            println!("{} {}", "❌".red(), info.message.red().bold());
            if !info.details.as_object().is_some_and(|d| d.is_empty()) {
                println!("{}", serde_json::to_string_pretty(&info.details)?);
            }
            anyhow::bail!("Import failed");
        }
    };

    let count = match created {
        Created::One(_) => 1,
        Created::Many(definitions) => definitions.len(),
    };

    println!(
        "{} {} definition(s) imported",
        "✅".green(),
        count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Deletes every definition after confirmation.
async fn purge(pool: &PgPool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Purge definitions".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete ALL definitions? This cannot be undone")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let result = sqlx::query("DELETE FROM definitions").execute(pool).await?;

    println!(
        "{} {} definition(s) deleted",
        "✅".green(),
        result.rows_affected().to_string().bright_green().bold()
    );
    println!();

    Ok(())
}
