//! Scheduled ingestion + alert pipeline.
//!
//! The [`Scheduler`] owns the configured city list and runs one *cycle* per
//! firing of its [`Trigger`]. A cycle walks the cities in order, one at a
//! time: ingest, then evaluate alerts for that city, regardless of whether
//! the ingest succeeded. A failure for one city never stops the cycle.
//!
//! # Triggers
//!
//! | Trigger | Use |
//! |---------|-----|
//! | [`IntervalTrigger`] | production; tokio interval, optionally aligned to the wall clock |
//! | [`ManualTrigger`] | tests and tooling; fires on channel sends |
//!
//! Cycles never overlap. If a cycle outlasts the interval, the missed tick
//! fires once as soon as the cycle ends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::alert::AlertEvaluator;
use crate::config::SchedulerConfig;
use crate::ingest::Ingestor;

/// Source of scheduler firings.
#[async_trait]
pub trait Trigger: Send {
    /// Wait for the next firing. Returns `false` once no more will come.
    async fn fired(&mut self) -> bool;
}

/// Fires every `period` on a tokio interval.
pub struct IntervalTrigger {
    interval: tokio::time::Interval,
}

impl IntervalTrigger {
    /// When `align_to_clock` is set the first firing lands on the next
    /// wall-clock multiple of `period` (e.g. :00, :05, :10 for 5 minutes);
    /// otherwise it lands one period from now.
    pub fn new(period: Duration, align_to_clock: bool) -> Self {
        let first_delay = if align_to_clock {
            delay_until_boundary(chrono::Utc::now().timestamp_millis(), period)
        } else {
            period
        };
        let mut interval = tokio::time::interval_at(Instant::now() + first_delay, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(
            Duration::from_secs(config.interval_secs),
            config.align_to_clock,
        )
    }
}

/// Time from `now_ms` (Unix millis) to the next multiple of `period`.
pub fn delay_until_boundary(now_ms: i64, period: Duration) -> Duration {
    let period_ms = period.as_millis().max(1) as i64;
    let remainder = now_ms.rem_euclid(period_ms);
    if remainder == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis((period_ms - remainder) as u64)
    }
}

#[async_trait]
impl Trigger for IntervalTrigger {
    async fn fired(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Fires once per `()` sent on the paired channel; exhausted when every
/// sender is dropped.
pub struct ManualTrigger {
    rx: mpsc::Receiver<()>,
}

impl ManualTrigger {
    pub fn channel(buffer: usize) -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self { rx })
    }
}

#[async_trait]
impl Trigger for ManualTrigger {
    async fn fired(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub stored: Vec<String>,
    pub failed: Vec<String>,
    pub alerts: Vec<String>,
}

pub struct Scheduler {
    cities: Vec<String>,
    ingestor: Ingestor,
    evaluator: AlertEvaluator,
}

impl Scheduler {
    pub fn new(cities: Vec<String>, ingestor: Ingestor, evaluator: AlertEvaluator) -> Self {
        Self {
            cities,
            ingestor,
            evaluator,
        }
    }

    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for city in &self.cities {
            if self.ingestor.ingest_city(city).await.is_stored() {
                report.stored.push(city.clone());
            } else {
                report.failed.push(city.clone());
            }

            match self.evaluator.evaluate(city).await {
                Ok(Some(alert)) => report.alerts.push(alert.city),
                Ok(None) => {}
                Err(e) => tracing::error!(city = %city, "Alert evaluation failed: {:#}", e),
            }
        }

        tracing::info!(
            stored = report.stored.len(),
            failed = report.failed.len(),
            alerts = report.alerts.len(),
            "Cycle complete"
        );
        report
    }

    /// Run a cycle on every firing until the trigger is exhausted.
    pub async fn run<T: Trigger>(self: Arc<Self>, mut trigger: T) {
        tracing::info!(cities = ?self.cities, "Scheduler started");
        while trigger.fired().await {
            self.run_cycle().await;
        }
        tracing::info!("Scheduler stopped");
    }
}
