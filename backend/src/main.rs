use std::sync::Arc;

use anyhow::Context;
use taskboard_server::{
    app_state::AppState,
    data_access::{
        data_context::DataContext, memory_store::MemoryStore, task_repository::TaskRepository,
        task_store::TaskStore,
    },
    map_routes,
    settings::{Settings, StorageKind},
};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings);

    // ── Store ──────────────────────────────────────────────────
    let store: Arc<dyn TaskStore> = match settings.storage {
        StorageKind::Redb => {
            let context = DataContext::open(&settings.database_path, &settings.table_name)
                .with_context(|| format!("failed to open {}", settings.database_path.display()))?;
            tracing::info!(
                path = %settings.database_path.display(),
                table = %settings.table_name,
                "redb store opened"
            );
            Arc::new(context)
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory store, tasks are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    // ── Shared state ───────────────────────────────────────────
    let state = Arc::new(AppState {
        tasks: TaskRepository::new(store),
        default_page_size: settings.default_page_size,
        max_page_size: settings.max_page_size,
    });

    // ── Start ──────────────────────────────────────────────────
    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, map_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter));

    #[cfg(feature = "profile-console")]
    let registry = registry.with(console_subscriber::spawn());

    registry.init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
