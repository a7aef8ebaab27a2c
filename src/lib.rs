//! # Weather Watch
//!
//! Periodically polls OpenWeatherMap for a fixed set of cities, stores each
//! reading in SQLite, raises an alert when a city stays above a temperature
//! threshold for two consecutive updates, and serves per-city daily rollups
//! over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌─────────┐
//! │ Scheduler │──▶│ Ingestor  │──▶│  Store   │◀──│ Summary │◀── GET /summary/{city}
//! │ (trigger) │   │ K → °C    │   │ (SQLite) │   │ (daily) │
//! └─────┬─────┘   └───────────┘   └────▲─────┘   └─────────┘
//!       │                              │
//!       └────────▶ Alert Evaluator ────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENWEATHERMAP_API_KEY=...
//! wxw init                 # create database
//! wxw poll                 # run one ingestion cycle now
//! wxw serve                # scheduler + HTTP server
//! wxw summary Delhi        # today's rollup
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML + environment configuration |
//! | [`models`] | Core data types |
//! | [`clock`] | Injectable wall clock |
//! | [`store`] | Reading store trait, SQLite and in-memory backends |
//! | [`provider`] | Weather provider trait and OpenWeatherMap client |
//! | [`ingest`] | Per-city ingestion |
//! | [`alert`] | Consecutive-reading threshold alerts |
//! | [`summary`] | Daily rollups |
//! | [`scheduler`] | Cycle driver and triggers |
//! | [`server`] | HTTP server |
//! | [`service`] | Component wiring |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`logging`] | Tracing subscriber setup |

pub mod alert;
pub mod clock;
pub mod config;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod provider;
pub mod scheduler;
pub mod server;
pub mod service;
pub mod store;
pub mod summary;
