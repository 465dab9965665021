//! todo-api バイナリのエントリポイント

use anyhow::Context;
use infrastructure::{DynamoDbClient, DynamoTodoStore, InMemoryTodoStore, TodoStore};
use shared::{Config, StoreBackend};
use std::sync::Arc;
use todo_api::{app_with_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let config = Config::from_env()?;

    let store: Arc<dyn TodoStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryTodoStore::new()),
        StoreBackend::DynamoDb => {
            let db = DynamoDbClient::new(&config).await;
            Arc::new(DynamoTodoStore::new(db))
        }
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, backend = ?config.store_backend, "server starting");

    axum::serve(listener, app_with_state(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
