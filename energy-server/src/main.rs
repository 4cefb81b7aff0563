use log::{LevelFilter, error, info};
use tokio_util::sync::CancellationToken;

mod api;
mod auth;
mod config;
mod handler;
mod predict;
mod state;

fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("energy_server", LevelFilter::Info)
        .filter_module("energy_db", LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = config::ServerConfig::load()?;
    let state = state::AppState::new(&config).await?;

    let cancel = CancellationToken::new();
    let server = api::start_api_server(config.bind_addr(), state, cancel.clone()).await?;

    tokio::select! {
        _ = cancel.cancelled() => {},
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            cancel.cancel();
        },
    }

    server.await?;
    Ok(())
}
