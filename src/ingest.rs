//! Ingestion of a single city.
//!
//! Fetches the current observation from the provider, converts Kelvin to
//! Celsius, stamps the reading with the ingestion clock and appends it to
//! the store. Failures never propagate: they are logged and reported as
//! [`FetchOutcome::Failed`] so the scheduler can move on to the next city.

use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::models::{Observation, Reading};
use crate::provider::WeatherProvider;
use crate::store::ReadingStore;

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Where an ingestion attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    Persist,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Fetch => write!(f, "fetch"),
            FailureStage::Persist => write!(f, "persist"),
        }
    }
}

/// Result of ingesting one city.
#[derive(Debug)]
pub enum FetchOutcome {
    Stored(Reading),
    Failed {
        city: String,
        stage: FailureStage,
        error: anyhow::Error,
    },
}

impl FetchOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, FetchOutcome::Stored(_))
    }
}

/// Build a reading for `city` from a provider observation.
pub fn reading_from_observation(
    city: &str,
    obs: Observation,
    recorded_at: chrono::DateTime<chrono::Utc>,
) -> Reading {
    Reading {
        city: city.to_string(),
        temperature: kelvin_to_celsius(obs.temp_kelvin),
        feels_like: kelvin_to_celsius(obs.feels_like_kelvin),
        condition: obs.condition,
        observed_at: obs.observed_at,
        recorded_at,
    }
}

pub struct Ingestor {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn ReadingStore>,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn ReadingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
        }
    }

    pub async fn ingest_city(&self, city: &str) -> FetchOutcome {
        let obs = match self.provider.current(city).await {
            Ok(obs) => obs,
            Err(error) => {
                tracing::error!(
                    city,
                    provider = self.provider.name(),
                    "Error fetching weather data: {:#}",
                    error
                );
                return FetchOutcome::Failed {
                    city: city.to_string(),
                    stage: FailureStage::Fetch,
                    error,
                };
            }
        };

        tracing::debug!(
            city,
            reported_name = %obs.name,
            temp_kelvin = obs.temp_kelvin,
            condition = %obs.condition,
            dt = obs.observed_at,
            "Fetched weather data"
        );

        let reading = reading_from_observation(city, obs, self.clock.now());

        if let Err(error) = self.store.append(&reading).await {
            tracing::error!(city, "Error saving weather reading: {:#}", error);
            return FetchOutcome::Failed {
                city: city.to_string(),
                stage: FailureStage::Persist,
                error,
            };
        }

        tracing::info!(
            city,
            temperature = reading.temperature,
            condition = %reading.condition,
            "Stored reading"
        );
        FetchOutcome::Stored(reading)
    }
}
