//! Runtime settings.
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! TOML file, environment variables, then command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::logging;

const KEYS: &[&str] = &[
    "storm_ui_host",
    "exporter_http_port",
    "refresh_rate",
    "log_level",
    "request_timeout",
    "metrics_path",
];

#[derive(Parser, Debug, Default)]
#[command(name = "stormwatch")]
#[command(about = "Export Apache Storm topology statistics as Prometheus metrics")]
pub struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storm UI address (host, host:port or URL) [default: localhost]
    #[arg(long)]
    pub storm_ui_host: Option<String>,

    /// Port to serve metrics on [default: 9800]
    #[arg(long)]
    pub exporter_http_port: Option<u16>,

    /// Seconds between collection cycles [default: 30]
    #[arg(long)]
    pub refresh_rate: Option<u64>,

    /// DEBUG, INFO, WARNING, ERROR or CRITICAL [default: INFO]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seconds to wait for each Storm UI request [default: 5]
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Path metrics are served on [default: /metrics]
    #[arg(long)]
    pub metrics_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub storm_ui_host: String,
    pub exporter_http_port: u16,
    /// Seconds between collection cycles.
    pub refresh_rate: u64,
    pub log_level: String,
    /// Seconds.
    pub request_timeout: u64,
    pub metrics_path: String,
}

impl Settings {
    /// Load settings from the process environment and `args`.
    pub fn load(args: &Args) -> Result<Self> {
        Self::load_from(args, std::env::vars())
    }

    /// Load settings using `vars` as the environment.
    pub fn load_from<I>(args: &Args, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: config::Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| KEYS.contains(&key.to_ascii_lowercase().as_str()))
            .collect();

        let mut builder = Config::builder()
            .set_default("storm_ui_host", "localhost")?
            .set_default("exporter_http_port", 9800_i64)?
            .set_default("refresh_rate", 30_i64)?
            .set_default("log_level", "INFO")?
            .set_default("request_timeout", 5_i64)?
            .set_default("metrics_path", "/metrics")?;

        if let Some(path) = &args.config {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        let config = builder
            .add_source(Environment::default().source(Some(env)).try_parsing(true))
            .set_override_option("storm_ui_host", args.storm_ui_host.clone())?
            .set_override_option("exporter_http_port", args.exporter_http_port.map(i64::from))?
            .set_override_option("refresh_rate", args.refresh_rate)?
            .set_override_option("log_level", args.log_level.clone())?
            .set_override_option("request_timeout", args.request_timeout)?
            .set_override_option("metrics_path", args.metrics_path.clone())?
            .build()
            .context("Failed to load settings")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_rate == 0 {
            bail!("refresh_rate must be positive");
        }
        if self.request_timeout == 0 {
            bail!("request_timeout must be positive");
        }
        if self.storm_ui_host.trim().is_empty() {
            bail!("storm_ui_host must not be empty");
        }
        if !self.metrics_path.starts_with('/') {
            bail!("metrics_path must start with '/': {}", self.metrics_path);
        }
        logging::parse_level(&self.log_level)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_rate)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Address the exposition server binds to.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.exporter_http_port)
    }
}
