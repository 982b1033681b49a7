//! CLI administration tool for the link registry.
//!
//! Manages links and inspects stored data directly against PostgreSQL,
//! going through the same registry as the HTTP service.
//!
//! # Usage
//!
//! ```bash
//! # List links, newest first
//! cargo run --bin admin -- links list
//!
//! # Create a link with a custom code
//! cargo run --bin admin -- links create https://example.com --code promo
//!
//! # Delete a link
//! cargo run --bin admin -- links delete promo
//!
//! # Report stored codes that are not in normalized form
//! cargo run --bin admin -- codes audit
//!
//! # Totals and database checks
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use link_registry::application::services::LinkRegistry;
use link_registry::domain::entities::Link;
use link_registry::infrastructure::persistence::PgLinkRepository;
use link_registry::utils::code_generator::{is_valid_code, normalize_code};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;

type Registry = LinkRegistry<PgLinkRepository>;

/// CLI tool for managing the link registry.
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
    /// Manage links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Inspect stored codes
    Codes {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Show totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links, newest first
    List,

    /// Show a single link with its statistics
    Show {
        /// Short code (case-insensitive)
        code: String,
    },

    /// Create a link
    Create {
        /// Target URL (absolute http/https)
        url: String,

        /// Custom code (generated if omitted)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Delete a link
    Delete {
        /// Short code (case-insensitive)
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Code inspection subcommands.
#[derive(Subcommand)]
enum CodeAction {
    /// Report codes that are not lowercase or not valid, and lowercase collisions
    Audit,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let registry = LinkRegistry::new(Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))));

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &registry).await?,
        Commands::Codes { action } => handle_code_action(action, &registry).await?,
        Commands::Stats => handle_stats(&registry).await?,
        Commands::Db { action } => handle_db_action(action, &registry, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, registry: &Registry) -> Result<()> {
    match action {
        LinkAction::List => list_links(registry).await,
        LinkAction::Show { code } => show_link(registry, &code).await,
        LinkAction::Create { url, code } => {
            let code = code.as_deref().filter(|c| !c.is_empty());
            create_link(registry, &url, code).await
        }
        LinkAction::Delete { code, yes } => delete_link(registry, &code, yes).await,
    }
}

/// Prints all links as a table.
async fn list_links(registry: &Registry) -> Result<()> {
    println!("{}", "Links".bright_blue().bold());
    println!();

    let links = registry
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<12} {:>8} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(80).bright_black());

    for link in &links {
        println!(
            "  {:<6} {:<12} {:>8} {:<18} {}",
            link.id.to_string().bright_black(),
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());

    Ok(())
}

/// Prints one link with its statistics.
async fn show_link(registry: &Registry, code: &str) -> Result<()> {
    let link = registry
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);
    Ok(())
}

async fn create_link(registry: &Registry, url: &str, code: Option<&str>) -> Result<()> {
    let link = registry
        .create(url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "Link created".green().bold());
    print_link(&link);
    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(registry: &Registry, code: &str, skip_confirm: bool) -> Result<()> {
    let link = registry
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let removed = registry
        .delete_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if removed == 0 {
        println!("{}", "Link was already gone".yellow());
    } else {
        println!("{}", format!("Deleted {} record(s)", removed).green().bold());
    }

    Ok(())
}

fn print_link(link: &Link) {
    let last_clicked = link
        .last_clicked
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!();
    println!("  Code:         {}", link.code.cyan().bold());
    println!("  URL:          {}", link.url);
    println!("  Redirects to: {}", link.target_url().bright_white());
    println!("  Clicks:       {}", link.clicks.to_string().bright_green());
    println!("  Last clicked: {}", last_clicked.bright_black());
    println!(
        "  Created:      {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Dispatches code inspection commands.
async fn handle_code_action(action: CodeAction, registry: &Registry) -> Result<()> {
    match action {
        CodeAction::Audit => {
            let links = registry
                .list_all()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

            print_audit(&audit_codes(&links));
        }
    }

    Ok(())
}

/// Stored codes that do not satisfy the current code rules.
#[derive(Debug, Default)]
struct CodeAudit {
    scanned: usize,
    /// Codes whose stored form differs from the normalized form.
    not_normalized: Vec<String>,
    /// Codes that are invalid even after normalization.
    invalid: Vec<String>,
    /// Normalized code mapped to the stored codes that would collide on it.
    collisions: BTreeMap<String, Vec<String>>,
}

impl CodeAudit {
    fn is_clean(&self) -> bool {
        self.not_normalized.is_empty() && self.invalid.is_empty() && self.collisions.is_empty()
    }
}

fn audit_codes(links: &[Link]) -> CodeAudit {
    let mut audit = CodeAudit {
        scanned: links.len(),
        ..CodeAudit::default()
    };
    let mut by_normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for link in links {
        let normalized = normalize_code(&link.code);

        if normalized != link.code {
            audit.not_normalized.push(link.code.clone());
        }
        if !is_valid_code(&normalized) {
            audit.invalid.push(link.code.clone());
        }

        by_normalized
            .entry(normalized)
            .or_default()
            .push(link.code.clone());
    }

    audit.collisions = by_normalized
        .into_iter()
        .filter(|(_, codes)| codes.len() > 1)
        .collect();

    audit
}

fn print_audit(audit: &CodeAudit) {
    println!("{}", "Code audit".bright_blue().bold());
    println!();
    println!("  Scanned: {}", audit.scanned.to_string().bright_white());

    if audit.is_clean() {
        println!("{}", "  All codes are normalized".green().bold());
        return;
    }

    if !audit.not_normalized.is_empty() {
        println!();
        println!("  {}", "Not lowercase:".yellow().bold());
        for code in &audit.not_normalized {
            println!("    {} -> {}", code.yellow(), normalize_code(code).cyan());
        }
    }

    if !audit.invalid.is_empty() {
        println!();
        println!("  {}", "Invalid format:".red().bold());
        for code in &audit.invalid {
            println!("    {}", code.red());
        }
    }

    if !audit.collisions.is_empty() {
        println!();
        println!("  {}", "Lowercase collisions:".red().bold());
        for (normalized, codes) in &audit.collisions {
            println!("    {} <- {}", normalized.cyan(), codes.join(", ").red());
        }
    }

    println!();
}

/// Displays link and click totals.
async fn handle_stats(registry: &Registry) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links = registry
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    let clicks: i64 = links.iter().map(|l| l.clicks).sum();
    let never_clicked = links.iter().filter(|l| l.last_clicked.is_none()).count();

    println!(
        "  Links:         {}",
        links.len().to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks.to_string().bright_green().bold()
    );
    println!(
        "  Never clicked: {}",
        never_clicked.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, registry: &Registry, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            registry
                .check_store()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
