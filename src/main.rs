//! # Weather Watch CLI (`wxw`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wxw init` | Create the SQLite database and schema |
//! | `wxw serve` | Run the scheduler and the HTTP server |
//! | `wxw poll` | Run one ingestion + alert cycle now |
//! | `wxw summary <city>` | Print today's rollup as JSON |
//! | `wxw latest <city>` | Print the most recent readings as JSON, newest first |
//!
//! The API key, database URL and port may also be supplied through
//! `OPENWEATHERMAP_API_KEY`, `DATABASE_URL` and `PORT`, either in the
//! process environment or in a `.env` file in the working directory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use weather_watch::provider::{OpenWeatherMapProvider, WeatherProvider};
use weather_watch::store::ReadingStore;
use weather_watch::{config, logging, service};

/// Weather Watch — scheduled weather ingestion with daily rollups and
/// threshold alerts.
#[derive(Parser)]
#[command(name = "wxw", version, about)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and schema. Idempotent.
    Init,

    /// Start the ingestion scheduler and the HTTP server.
    Serve,

    /// Run a single ingestion + alert cycle for every configured city.
    Poll,

    /// Print today's summary for a city.
    Summary {
        city: String,
    },

    /// Print the most recent readings for a city.
    Latest {
        city: String,

        /// Maximum number of readings to print.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables already set in the environment win over `.env`.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    logging::init_logging(&cfg.logging)?;
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    match cli.command {
        Commands::Init => {
            service::open_store(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            service::run_service(&cfg).await?;
        }
        Commands::Poll => {
            let provider: Arc<dyn WeatherProvider> =
                Arc::new(OpenWeatherMapProvider::new(&cfg.provider)?);
            let components = service::open_components(&cfg).await?;
            let report = components.scheduler(&cfg, provider).run_cycle().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Summary { city } => {
            let components = service::open_components(&cfg).await?;
            let summary = components.summaries().summarize(&city).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Latest { city, limit } => {
            let components = service::open_components(&cfg).await?;
            let readings = components.store.latest_n(&city, limit).await?;
            println!("{}", serde_json::to_string_pretty(&readings)?);
        }
    }

    Ok(())
}
