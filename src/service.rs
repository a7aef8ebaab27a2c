//! Wiring for the long-running service and one-shot commands.
//!
//! [`Components`] bundles the shared store and clock; the scheduler and the
//! HTTP server are built from it so both observe the same readings.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::alert::{AlertEvaluator, LogAlertSink};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db;
use crate::ingest::Ingestor;
use crate::migrate;
use crate::provider::{OpenWeatherMapProvider, WeatherProvider};
use crate::scheduler::{IntervalTrigger, Scheduler};
use crate::server::{self, AppState};
use crate::store::sqlite::SqliteStore;
use crate::store::ReadingStore;
use crate::summary::SummaryAggregator;

#[derive(Clone)]
pub struct Components {
    pub store: Arc<dyn ReadingStore>,
    pub clock: Arc<dyn Clock>,
}

impl Components {
    pub fn new(store: Arc<dyn ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn scheduler(&self, config: &Config, provider: Arc<dyn WeatherProvider>) -> Scheduler {
        let ingestor = Ingestor::new(provider, self.store.clone(), self.clock.clone());
        let evaluator = AlertEvaluator::new(
            self.store.clone(),
            Arc::new(LogAlertSink),
            config.alert.threshold_celsius,
        );
        Scheduler::new(config.scheduler.cities.clone(), ingestor, evaluator)
    }

    pub fn summaries(&self) -> SummaryAggregator {
        SummaryAggregator::new(self.store.clone(), self.clock.clone())
    }
}

/// Connect to the database and make sure the schema exists.
///
/// Fails fast: a process that cannot reach its store does not start.
pub async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = db::connect(config)
        .await
        .context("Database unavailable at startup")?;
    migrate::run_migrations(&pool).await?;
    tracing::info!(url = %config.db.url, "Connected to database");
    Ok(SqliteStore::new(pool))
}

pub async fn open_components(config: &Config) -> Result<Components> {
    let store = open_store(config).await?;
    Ok(Components::new(Arc::new(store), Arc::new(SystemClock)))
}

/// Run the scheduler and the HTTP server until Ctrl-C.
pub async fn run_service(config: &Config) -> Result<()> {
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherMapProvider::new(&config.provider)?);
    let components = open_components(config).await?;

    let scheduler = Arc::new(components.scheduler(config, provider));
    let trigger = IntervalTrigger::from_config(&config.scheduler);
    tracing::info!(
        interval_secs = config.scheduler.interval_secs,
        align_to_clock = config.scheduler.align_to_clock,
        "Scheduling ingestion"
    );
    let scheduler_task = tokio::spawn(scheduler.run(trigger));

    let state = AppState {
        summaries: Arc::new(components.summaries()),
    };
    let served = server::run_server(&config.server.bind_addr(), state, shutdown_signal()).await;

    scheduler_task.abort();
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
