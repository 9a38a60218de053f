//! Hotel booking conflict service: CLI
//!
//! ```sh
//! # Run with default config (~/.config/hotel-booking/config.toml)
//! hotel-booking
//!
//! # Custom config path
//! hotel-booking --config /etc/hotel-booking/config.toml
//!
//! # One expiry sweep, then exit (e.g. from cron)
//! hotel-booking sweep
//!
//! # Conflict statistics for January as JSON
//! hotel-booking stats --from 2025-01-01 --to 2025-01-31
//!
//! # Validate config without starting
//! hotel-booking --check
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use hotel_booking::config::AppConfig;
use hotel_booking::server::{init_tracing, ServiceHandle, ServiceOptions};

/// Booking-conflict detection and room waiting lists.
#[derive(Parser, Debug)]
#[command(
    name = "hotel-booking",
    version,
    about = "Booking conflict detection and waiting list service",
    long_about = "Detects booking conflicts, manages room waiting lists and \
                  expires stale entries in the background.\n\n\
                  Default config: ~/.config/hotel-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "HOTEL_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Validate the configuration file and exit without starting.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the service with the background sweeper (default).
    Run,
    /// Expire stale waiting list entries once and exit.
    Sweep,
    /// Print conflict statistics for an inclusive date range as JSON.
    Stats {
        /// First day (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// Restrict to one room.
        #[arg(long)]
        room: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(hotel_booking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Database    : {}", config.database.url);
        println!(
            "   Sweeper     : {} (every {}s, batch {})",
            if config.sweeper.enabled { "enabled" } else { "disabled" },
            config.sweeper.interval_secs,
            config.sweeper.batch_size
        );
        println!(
            "   Metrics     : {}",
            if config.metrics.enabled { config.metrics.listen.as_str() } else { "disabled" }
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let command = cli.command.unwrap_or(Command::Run);
    let background_tasks = matches!(command, Command::Run);

    let handle = ServiceHandle::start(ServiceOptions {
        config,
        auto_migrate: !cli.no_migrate,
        background_tasks,
    })
    .await?;

    match command {
        Command::Run => {
            handle.install_signal_handler();
            info!("Press Ctrl+C to shutdown gracefully.");

            handle.shutdown_signal().wait().await;
            handle.wait().await;
        }
        Command::Sweep => {
            let result = handle.service.cleanup_expired_waiting_list().await;
            handle.shutdown().await;
            let expired = result?;
            println!("Expired {} waiting list entries", expired);
        }
        Command::Stats { from, to, room } => {
            let result = handle.service.get_conflict_statistics(from, to, room).await;
            handle.shutdown().await;
            let stats = result?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
