pub mod about;
pub mod api;
pub mod body;

use std::sync::Arc;

use anyhow::Result;
use colored::*;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::storage::{MemoryStore, MessageStore, MongoStore};

pub use api::{router, AppState};

/// Connect the store, serve until Ctrl+C / SIGTERM, then close the store.
pub async fn start(config: Config, memory: bool) -> Result<()> {
    let store: Arc<dyn MessageStore> = if memory {
        info!("Using in-memory message store");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(MongoStore::connect(&config).await)
    };

    let state = AppState::new(store.clone()).with_redacted_errors(config.redact_errors);
    let app = router(state, config.log_requests());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    println!(
        "{} Server running at {}",
        "✓".green(),
        format!("http://{}", addr).bright_blue()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
