use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_tables::config::AppConfig;
use market_tables::domain::Factory;
use market_tables::metrics::{Metrics, MetricsServer};
use market_tables::services::{CommandHandler, NoopUpdater, WorkStarted};
use market_tables::store::{Repo, ScyllaStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,market_tables=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Starting market tables update");

    // === 1. Metrics registry and exporter ===
    let metrics = Arc::new(Metrics::new()?);
    MetricsServer::new(metrics.registry().clone(), config.metrics_port).spawn();

    // === 2. Repository over ScyllaDB ===
    let factory = Arc::new(Factory::main());
    let store = Arc::new(ScyllaStore::new(
        &config.store_uri,
        &config.store_keyspace,
        factory.groups().cloned(),
    ));
    let repo = Arc::new(Repo::new(factory, store, config.store_timeout).with_metrics(metrics));
    repo.start().await?;

    // === 3. Seed command, cancelled on Ctrl-C ===
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling");
                cancel.cancel();
            }
        }
    });

    let commands = WorkStarted::new(config.zone, config.cutoff).start(cancel);

    // === 4. Handle commands until the producer is done ===
    let handler = CommandHandler::new(repo.clone(), Arc::new(NoopUpdater));
    let handled = handler.run(commands).await;

    repo.shutdown().await?;
    let handled = handled?;

    tracing::info!(handled, "Update cycle complete");
    Ok(())
}
