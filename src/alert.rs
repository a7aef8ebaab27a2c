//! Consecutive-reading temperature alerts.
//!
//! After every ingestion attempt the scheduler asks the [`AlertEvaluator`]
//! to look at the two most recent readings for the city. When both are
//! strictly above the threshold an [`Alert`] is handed to the configured
//! [`AlertSink`]. There is no alert history: a condition that still holds
//! on the next cycle fires again.

use std::sync::Arc;

use anyhow::Result;

use crate::models::{Alert, Reading};
use crate::store::ReadingStore;

/// Number of consecutive readings that must exceed the threshold.
pub const CONSECUTIVE_UPDATES: usize = 2;

/// Destination for emitted alerts.
pub trait AlertSink: Send + Sync {
    fn send(&self, alert: &Alert);
}

/// Writes alerts to the log at `WARN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn send(&self, alert: &Alert) {
        tracing::warn!(city = %alert.city, "ALERT: {}", alert.message);
    }
}

pub fn alert_message(threshold: f64, city: &str) -> String {
    format!(
        "Temperature exceeded {}°C for two consecutive updates in {}",
        threshold, city
    )
}

/// True when there are enough readings and every one of the first
/// [`CONSECUTIVE_UPDATES`] is strictly above `threshold`.
pub fn exceeds_threshold(latest: &[Reading], threshold: f64) -> bool {
    latest.len() >= CONSECUTIVE_UPDATES
        && latest[..CONSECUTIVE_UPDATES]
            .iter()
            .all(|r| r.temperature > threshold)
}

pub struct AlertEvaluator {
    store: Arc<dyn ReadingStore>,
    sink: Arc<dyn AlertSink>,
    threshold: f64,
}

impl AlertEvaluator {
    pub fn new(store: Arc<dyn ReadingStore>, sink: Arc<dyn AlertSink>, threshold: f64) -> Self {
        Self {
            store,
            sink,
            threshold,
        }
    }

    /// Check the latest readings for `city`, emitting and returning an
    /// alert if the threshold was exceeded.
    pub async fn evaluate(&self, city: &str) -> Result<Option<Alert>> {
        let latest = self.store.latest_n(city, CONSECUTIVE_UPDATES).await?;

        if !exceeds_threshold(&latest, self.threshold) {
            return Ok(None);
        }

        let alert = Alert {
            city: city.to_string(),
            message: alert_message(self.threshold, city),
        };
        self.sink.send(&alert);
        Ok(Some(alert))
    }
}
