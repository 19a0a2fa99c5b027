use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use salon_app::app::api::routes;
use salon_app::config::ConfigHandler;
use salon_app::db_handler::{DbProviderHandler, SharedDb};
use salon_app::notifier_handler::NotifierHandler;
use salon_app::reminders::spawn_reminder_sweeps;
use salon_core::config::load_config;
use salon_db::db::connection::{create_pool, run_migrations};
use salon_service::notify::{Notifier, TracingNotifier};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting salon booking server");

    let config = load_config()?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        timezone = %config.schedule.timezone,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    run_migrations(&config.database.url).await?;

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    if config.schedule.reminders_enabled {
        let sweep_db: SharedDb = Arc::new(pool.clone());
        let sweeps = spawn_reminder_sweeps(&sweep_db, &config.schedule, &notifier);
        tracing::info!(sweeps = sweeps.len(), "Reminder sweeps started");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(DbProviderHandler::new(pool))
        .hoop(ConfigHandler {
            settings: Arc::new(config),
        })
        .hoop(NotifierHandler { notifier })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
