//! # Contact Book CLI (`contacts`)
//!
//! The `contacts` binary initializes the database, runs the HTTP server, and
//! offers direct access to the four contact operations.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `contacts init` | Create the SQLite database and schema |
//! | `contacts serve` | Start the JSON HTTP server |
//! | `contacts add <name> <email> <phone>` | Create a contact |
//! | `contacts list [--page N] [--limit N]` | Print one page of contacts |
//! | `contacts update <id> <name> <email> <phone>` | Replace a contact's fields |
//! | `contacts delete <id>` | Delete a contact |
//!
//! ## Logging
//!
//! Log output goes to stderr and is filtered with `RUST_LOG`
//! (default `info`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contact_book::config::{self, Config};
use contact_book::models::ContactInput;
use contact_book::service::ContactService;
use contact_book::store::SqliteStore;
use contact_book::{db, migrate, server};

/// Contact Book — create, list, update, and delete contacts.
#[derive(Parser)]
#[command(name = "contacts", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Defaults are used when it is missing.
    #[arg(long, global = true, default_value = "./config/contacts.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to `[server].host` and `[server].port` (or `PORT`).
    Serve,

    /// Create a contact.
    Add {
        name: String,
        email: String,
        phone: String,
    },

    /// List contacts, one page at a time.
    List {
        /// Page number, starting at 1.
        #[arg(long)]
        page: Option<String>,

        /// Contacts per page.
        #[arg(long)]
        limit: Option<String>,
    },

    /// Replace the name, email, and phone of a contact.
    Update {
        id: i64,
        name: String,
        email: String,
        phone: String,
    },

    /// Delete a contact by id.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Add { name, email, phone } => {
            let svc = open_service(&cfg).await?;
            let contact = svc.create(&ContactInput::new(name, email, phone)).await?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
        Commands::List { page, limit } => {
            let svc = open_service(&cfg).await?;
            let page = svc.list(page.as_deref(), limit.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Update {
            id,
            name,
            email,
            phone,
        } => {
            let svc = open_service(&cfg).await?;
            let contact = svc
                .update(id, &ContactInput::new(name, email, phone))
                .await?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
        Commands::Delete { id } => {
            let svc = open_service(&cfg).await?;
            svc.delete(id).await?;
            println!("Deleted contact {}.", id);
        }
    }

    Ok(())
}

async fn open_service(cfg: &Config) -> anyhow::Result<ContactService> {
    let pool = db::connect(cfg).await?;
    migrate::apply(&pool)
        .await
        .context("Failed to prepare database schema")?;
    Ok(ContactService::new(Arc::new(SqliteStore::new(pool))))
}
