//! Storage abstraction for weather readings.
//!
//! The [`ReadingStore`] trait is an append-only log of [`Reading`]s keyed
//! by city and ingestion time. Two backends are provided:
//!
//! - [`SqliteStore`](sqlite::SqliteStore) — durable storage via `sqlx`.
//! - [`InMemoryStore`](memory::InMemoryStore) — for tests and dry runs.
//!
//! Implementations must be `Send + Sync` so the scheduler task and the HTTP
//! handlers can share one store behind an `Arc`.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Reading;

/// Append-only reading log.
///
/// | Method | Ordering |
/// |--------|----------|
/// | [`append`](ReadingStore::append) | — |
/// | [`latest_n`](ReadingStore::latest_n) | most recent first, later insertion wins ties |
/// | [`since`](ReadingStore::since) | insertion order |
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist a new reading.
    async fn append(&self, reading: &Reading) -> Result<()>;

    /// Up to `n` most recent readings for `city` by `recorded_at`.
    async fn latest_n(&self, city: &str, n: usize) -> Result<Vec<Reading>>;

    /// All readings for `city` with `recorded_at >= boundary`.
    async fn since(&self, city: &str, boundary: DateTime<Utc>) -> Result<Vec<Reading>>;
}
