use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use stormwatch::logging::init_logging;
use stormwatch::{Args, Poller, Settings};
use stormwatch_adapters::{Collector, StormUiClient};
use stormwatch_sdk::prometheus::{PrometheusConfig, PrometheusExporter};
use stormwatch_sdk::MetricRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args)?;
    init_logging(&settings.log_level)?;

    info!(
        port = settings.exporter_http_port,
        storm_ui = %settings.storm_ui_host,
        refresh_rate = settings.refresh_rate,
        "Starting Storm Metrics Exporter on port {}",
        settings.exporter_http_port
    );

    let registry = Arc::new(MetricRegistry::new());

    let exporter = PrometheusExporter::new(
        PrometheusConfig::builder()
            .listen_addr(settings.listen_addr())
            .metrics_path(settings.metrics_path.clone())
            .build(),
        registry.clone(),
    );
    let server = match exporter.start_server().await {
        Ok(server) => server,
        Err(e) => {
            error!(
                error = %e,
                "Failed to bind metrics endpoint on {}",
                settings.listen_addr()
            );
            std::process::exit(1);
        }
    };
    info!(addr = %server.local_addr(), path = %settings.metrics_path, "Serving metrics");

    let client = StormUiClient::builder()
        .endpoint(settings.storm_ui_host.clone())
        .timeout(settings.timeout())
        .build()
        .context("Failed to create Storm UI client")?;
    let collector = Arc::new(Collector::new(client, registry));

    let poller = Poller::new(collector, settings.refresh_interval()).start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Stopping Storm Metrics Exporter");

    poller.stop().await;
    server.abort();

    Ok(())
}
