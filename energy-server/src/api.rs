use anyhow::Context;
use axum::{Router, routing::post};
use log::{error, info};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    handler::{auth::auth_router, predict::predict},
    state::AppState,
};

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .nest("/auth", auth_router())
        .route("/predict", post(predict))
        .with_state(state)
}

pub(crate) async fn start_api_server(
    addr: &str,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    let app = router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("API server started on {}", listener.local_addr()?);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel.clone()))
            .await
        {
            error!("Error running API server: {}", e);
        }
        cancel.cancel();
    }))
}

async fn shutdown_signal(cancel: CancellationToken) {
    cancel.cancelled().await;
    info!("Shutting down API server...");
}
