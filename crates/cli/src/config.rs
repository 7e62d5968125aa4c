//! Layered CLI configuration: reference defaults, optional TOML file, then
//! `ROUND_CURVE_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use round_curve::{Amount, CurveParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_PREFIX: &str = "ROUND_CURVE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub params: CurveParams,
    /// Snapshot used when `--distributed` is not given
    pub distributed: Option<Amount>,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            params: CurveParams::default(),
            distributed: None,
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_source())
    }

    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(env);

        let config: AppConfig = builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;

        config
            .params
            .validate()
            .context("invalid curve parameters")?;
        Ok(config)
    }

    pub fn is_json_logging(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// `ROUND_CURVE_LOG_LEVEL`, `ROUND_CURVE_PARAMS__ROUND_VOLUME`, ...
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
/// Logs go to stderr so quote output on stdout stays machine-readable.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.is_json_logging() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("failed to install tracing subscriber")?;
    }

    Ok(())
}
