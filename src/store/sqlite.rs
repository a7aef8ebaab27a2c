//! SQLite-backed [`ReadingStore`] implementation.
//!
//! Maps readings onto the `weather` table created by
//! [`run_migrations`](crate::migrate::run_migrations). The autoincrement
//! `id` column records insertion order.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::Reading;

use super::ReadingStore;

/// SQLite implementation of the [`ReadingStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_reading(row: &SqliteRow) -> Result<Reading> {
    let date_ms: i64 = row.get("date");
    let recorded_at = DateTime::<Utc>::from_timestamp_millis(date_ms)
        .ok_or_else(|| anyhow!("stored date out of range: {}", date_ms))?;

    Ok(Reading {
        city: row.get("city"),
        temperature: row.get("temp"),
        feels_like: row.get("feels_like"),
        condition: row.get("main"),
        observed_at: row.get("dt"),
        recorded_at,
    })
}

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn append(&self, reading: &Reading) -> Result<()> {
        sqlx::query(
            "INSERT INTO weather (city, temp, feels_like, main, dt, date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&reading.city)
        .bind(reading.temperature)
        .bind(reading.feels_like)
        .bind(&reading.condition)
        .bind(reading.observed_at)
        .bind(reading.recorded_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_n(&self, city: &str, n: usize) -> Result<Vec<Reading>> {
        let rows = sqlx::query(
            r#"
            SELECT city, temp, feels_like, main, dt, date
            FROM weather
            WHERE city = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(city)
        .bind(i64::try_from(n).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_reading).collect()
    }

    async fn since(&self, city: &str, boundary: DateTime<Utc>) -> Result<Vec<Reading>> {
        let rows = sqlx::query(
            r#"
            SELECT city, temp, feels_like, main, dt, date
            FROM weather
            WHERE city = ? AND date >= ?
            ORDER BY id ASC
            "#,
        )
        .bind(city)
        .bind(boundary.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_reading).collect()
    }
}
