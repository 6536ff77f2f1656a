use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricket_ledger::api::{build_router, state::AppState};
use cricket_ledger::config::AppConfig;
use cricket_ledger::service;
use cricket_ledger::storage::{JsonlStore, MemoryStore, RecordStore, StorageConfig};

#[derive(Parser)]
#[command(name = "cricket-ledger")]
#[command(about = "Ledger and career statistics for informal cricket matches")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Keep records in memory only
        #[arg(long)]
        in_memory: bool,
    },

    /// Print statistics for every player
    Players,

    /// Print statistics for one player
    Player {
        /// Player id
        id: i64,
    },

    /// Print per-player totals for a calendar month
    Monthly {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Print dismissals between two players
    HeadToHead {
        /// First player id
        a: i64,

        /// Second player id
        b: i64,
    },

    /// Create the starter roster if no players exist
    Seed,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting cricket-ledger v{}", env!("CARGO_PKG_VERSION"));

    let jsonl = || JsonlStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            let store: Arc<dyn RecordStore> = if in_memory {
                tracing::warn!("Using in-memory store; records are lost on exit");
                Arc::new(MemoryStore::new())
            } else {
                tracing::info!("Using data directory {}", config.data_dir.display());
                Arc::new(jsonl())
            };

            if config.roster.seed_on_empty {
                service::seed_roster_if_empty(store.as_ref(), &config.roster.seed_players)
                    .await?;
            }

            let app = build_router(AppState::new(store), &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Players => {
            let stats = service::list_all_player_statistics(&jsonl()).await?;
            if stats.is_empty() {
                println!("No players registered.");
                return Ok(());
            }
            println!(
                "{:>4}  {:<16} {:>3} {:>5} {:>7} {:>7} {:>4} {:>6} {:>6} {:>6}",
                "ID", "Name", "M", "Runs", "Avg", "SR", "Wkts", "Overs", "Econ", "Best"
            );
            for s in &stats {
                println!(
                    "{:>4}  {:<16} {:>3} {:>5} {:>7.2} {:>7.2} {:>4} {:>6} {:>6.2} {:>6}",
                    s.player.id,
                    s.player.name,
                    s.matches,
                    s.total_runs,
                    s.batting_average,
                    s.strike_rate,
                    s.total_wickets,
                    s.overs_bowled.as_str(),
                    s.economy_rate,
                    s.best_bowling
                );
            }
        }
        Commands::Player { id } => {
            print_json(&service::get_player_statistics(&jsonl(), id).await?)?;
        }
        Commands::Monthly { year, month } => {
            print_json(&service::monthly_performance(&jsonl(), year, month).await?)?;
        }
        Commands::HeadToHead { a, b } => {
            print_json(&service::head_to_head(&jsonl(), a, b).await?)?;
        }
        Commands::Seed => {
            let created =
                service::seed_roster_if_empty(&jsonl(), &config.roster.seed_players).await?;
            if created == 0 {
                println!("Roster already has players; nothing seeded");
            } else {
                println!("Seeded {} players", created);
            }
        }
    }

    Ok(())
}
