use std::sync::Arc;

use energy_db::{AccountStore, CredentialDatabase, TursoAccountStore, memory::MemoryAccountStore};
use log::{info, warn};

use crate::{
    auth::AuthService,
    config::{MEMORY_STORE, ServerConfig},
    predict::PredictionClient,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub predictor: PredictionClient,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let store = open_store(config.db_url()).await?;
        let auth = AuthService::new(store, config.store_timeout())?;
        let predictor = PredictionClient::new(config.prediction_url(), config.prediction_timeout())?;
        Ok(Self { auth, predictor })
    }
}

async fn open_store(url: &str) -> anyhow::Result<Arc<dyn AccountStore>> {
    if url == MEMORY_STORE {
        warn!("Using in-memory account store, accounts will not survive a restart");
        return Ok(Arc::new(MemoryAccountStore::new()));
    }

    info!("Opening credential database at {url}");
    let db = CredentialDatabase::open(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open credential database: {e:?}"))?;
    Ok(Arc::new(TursoAccountStore::new(Arc::new(db))))
}
