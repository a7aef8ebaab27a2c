//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so command output on stdout stays machine-readable.

use anyhow::{bail, Result};
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            "sqlx=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        );

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().with_writer(io::stderr).json())
            .try_init(),
        "compact" => registry
            .with(fmt::layer().with_writer(io::stderr).compact())
            .try_init(),
        "pretty" => registry
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .try_init(),
        other => bail!("Unknown logging format: '{}'", other),
    };

    if let Err(e) = result {
        bail!("Failed to initialize logging: {}", e);
    }
    Ok(())
}
