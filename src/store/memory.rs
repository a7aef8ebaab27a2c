//! In-memory [`ReadingStore`] implementation for tests.
//!
//! Keeps every reading in a single `Vec` behind `std::sync::RwLock`; the
//! vector index doubles as the insertion sequence.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Reading;

use super::ReadingStore;

#[derive(Default)]
pub struct InMemoryStore {
    readings: RwLock<Vec<Reading>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadingStore for InMemoryStore {
    async fn append(&self, reading: &Reading) -> Result<()> {
        self.readings
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(reading.clone());
        Ok(())
    }

    async fn latest_n(&self, city: &str, n: usize) -> Result<Vec<Reading>> {
        let readings = self.readings.read().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<(usize, &Reading)> = readings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.city == city)
            .collect();

        matching.sort_by(|(ia, a), (ib, b)| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then_with(|| ib.cmp(ia))
        });

        Ok(matching
            .into_iter()
            .take(n)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn since(&self, city: &str, boundary: DateTime<Utc>) -> Result<Vec<Reading>> {
        let readings = self.readings.read().unwrap_or_else(|e| e.into_inner());
        Ok(readings
            .iter()
            .filter(|r| r.city == city && r.recorded_at >= boundary)
            .cloned()
            .collect())
    }
}
