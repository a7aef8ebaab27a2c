//! Core data models used throughout Weather Watch.
//!
//! These types represent the raw provider observations, the stored readings,
//! and the alerts that flow through the ingestion pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw observation returned by a weather provider, in provider units.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// City name as reported by the provider (may differ from the query).
    pub name: String,
    pub temp_kelvin: f64,
    pub feels_like_kelvin: f64,
    /// Short condition label, e.g. `"Clear"` or `"Rain"`.
    pub condition: String,
    /// Provider epoch seconds of the observation.
    pub observed_at: i64,
}

/// One stored weather reading for a city.
///
/// Immutable once appended. `recorded_at` is ingestion time and is
/// independent of the provider's `observed_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub city: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Degrees Celsius.
    pub feels_like: f64,
    pub condition: String,
    pub observed_at: i64,
    pub recorded_at: DateTime<Utc>,
}

/// A threshold alert raised for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub city: String,
    pub message: String,
}
