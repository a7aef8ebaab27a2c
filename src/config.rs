//! Configuration loading.
//!
//! Settings come from an optional TOML file, then process environment
//! overrides (`OPENWEATHERMAP_API_KEY`, `DATABASE_URL`, `PORT`), then
//! validation. Every section has defaults, so an absent file is valid.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const ENV_API_KEY: &str = "OPENWEATHERMAP_API_KEY";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PORT: &str = "PORT";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

fn default_db_url() -> String {
    "sqlite:./data/weather.sqlite".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    /// Returns the API key, failing when none was configured.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => bail!(
                "provider API key not set (use {} or provider.api_key)",
                ENV_API_KEY
            ),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Fire on wall-clock multiples of the interval, like a `*/5` cron entry.
    #[serde(default = "default_align_to_clock")]
    pub align_to_clock: bool,
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            align_to_clock: default_align_to_clock(),
            cities: default_cities(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}
fn default_align_to_clock() -> bool {
    true
}

pub const DEFAULT_CITIES: [&str; 6] = [
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bangalore",
    "Kolkata",
    "Hyderabad",
];

fn default_cities() -> Vec<String> {
    DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    #[serde(default = "default_threshold")]
    pub threshold_celsius: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_celsius: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    35.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    4000
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Applies environment overrides using `lookup` to read variables.
    /// Empty or whitespace-only values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.db.url = url;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: '{}'", ENV_PORT, port))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.db.url.trim().is_empty() {
            bail!("db.url must not be empty");
        }
        if self.scheduler.interval_secs == 0 {
            bail!("scheduler.interval_secs must be > 0");
        }
        if self.scheduler.cities.is_empty() {
            bail!("scheduler.cities must list at least one city");
        }
        if self.scheduler.cities.iter().any(|c| c.trim().is_empty()) {
            bail!("scheduler.cities must not contain empty names");
        }
        if !self.alert.threshold_celsius.is_finite() {
            bail!("alert.threshold_celsius must be a finite number");
        }
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be > 0");
        }
        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => bail!(
                "Unknown logging format: '{}'. Must be pretty, compact, or json.",
                other
            ),
        }
        Ok(())
    }
}

/// Parses a TOML document into a [`Config`] without env overrides.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

/// Loads configuration from `path` (if given), applies the process
/// environment, and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            parse_config(&content)?
        }
        None => Config::default(),
    };

    config.apply_env(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.scheduler.interval_secs, 300);
        assert_eq!(config.scheduler.cities.len(), 6);
        assert_eq!(config.scheduler.cities[0], "Delhi");
        assert_eq!(config.server.port, 4000);
        assert!((config.alert.threshold_celsius - 35.0).abs() < 1e-9);
        assert!(config.provider.api_key.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse_config(
            r#"
[scheduler]
interval_secs = 60
cities = ["Pune"]

[server]
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(config.scheduler.interval_secs, 60);
        assert_eq!(config.scheduler.cities, vec!["Pune".to_string()]);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "secret"),
            (ENV_DATABASE_URL, "sqlite:/tmp/w.sqlite"),
            (ENV_PORT, "5001"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.provider.require_api_key().unwrap(), "secret");
        assert_eq!(config.db.url, "sqlite:/tmp/w.sqlite");
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config
            .apply_env(|name| match name {
                ENV_PORT => Some("".to_string()),
                ENV_DATABASE_URL => Some("   ".to_string()),
                ENV_API_KEY => Some(String::new()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.db.url, "sqlite:./data/weather.sqlite");
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(|name| (name == ENV_PORT).then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        assert!(config.provider.require_api_key().is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.scheduler.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scheduler.cities = vec![];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scheduler.cities = vec!["  ".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
